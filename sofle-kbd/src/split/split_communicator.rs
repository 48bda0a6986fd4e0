use embedded_hal_0_2::timer::CountDown;
use heapless::Vec;

use super::{Connection, ConnectionExt, Error, Message, SplitState};
use crate::keyboard::KeySwitchIdentifier;
use crate::log;

pub struct SplitCommunicator<
    const SZ: usize,
    const RO: usize,
    I: KeySwitchIdentifier<SZ>,
    S: Connection,
    C: CountDown,
> where
    C::Time: Copy,
{
    connection: S,
    state: SplitState,
    timer: C,
    /// Last switch set received from the other half.
    buffer: Vec<I, RO>,
    timeout: C::Time,
}

impl<const SZ: usize, const RO: usize, I: KeySwitchIdentifier<SZ>, S: Connection, C: CountDown>
    SplitCommunicator<SZ, RO, I, S, C>
where
    C::Time: Copy,
{
    pub fn new(connection: S, timer: C, timeout: C::Time) -> Self {
        SplitCommunicator {
            connection,
            state: SplitState::Undetermined,
            timer,
            buffer: Vec::new(),
            timeout,
        }
    }

    pub fn establish(&mut self) -> Result<(), Error<S::Error>> {
        self.state = SplitState::Undetermined;
        self.connection
            .send_message(Message::<SZ, RO, I>::FindReceiver);
        self.state = match self.read()? {
            Message::Acknowledge => {
                log::info!("split connection established");
                SplitState::Controller
            }
            _ => {
                log::warn!("unexpected reply to FindReceiver");
                SplitState::Undetermined
            }
        };
        Ok(())
    }

    pub fn state(&self) -> SplitState {
        self.state
    }

    /// Handles one request from the controller half.
    pub fn respond(&mut self, keys: &Vec<I, RO>) {
        match self.read() {
            Ok(Message::Switches(switches)) => {
                self.buffer = switches;
                self.connection
                    .send_message(Message::SwitchesReply(keys.clone()));
            }
            Ok(Message::SwitchesReply(switches)) => {
                // A late reply from before the roles settled.
                self.buffer = switches;
            }
            Ok(Message::FindReceiver) => {
                self.connection
                    .send_message(Message::<SZ, RO, I>::Acknowledge);
                if self.state != SplitState::Receiver {
                    log::info!("split connection accepted");
                }
                self.state = SplitState::Receiver;
            }
            Ok(Message::Acknowledge) => {
                log::warn!("received unexpected Acknowledge");
            }
            Err(e) => {
                log::warn!("failed to receive request: {:?}", e);
            }
        }
    }

    /// Exchanges switch sets. The controller sends `keys` and returns the
    /// reply, the receiver returns what `respond` stored last. Failures fall
    /// back to the last known set.
    pub fn request(&mut self, keys: &Vec<I, RO>) -> Vec<I, RO> {
        match self.state {
            SplitState::Controller => {
                self.connection
                    .send_message(Message::Switches(keys.clone()));
                match self.read() {
                    Ok(Message::SwitchesReply(switches)) => {
                        self.buffer = switches.clone();
                        switches
                    }
                    Ok(_) => {
                        log::warn!("received unexpected reply");
                        self.buffer.clone()
                    }
                    Err(e) => {
                        log::warn!("failed to receive reply: {:?}", e);
                        self.buffer.clone()
                    }
                }
            }
            SplitState::Receiver => self.buffer.clone(),
            SplitState::Undetermined => Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &S {
        &self.connection
    }

    fn read(&mut self) -> Result<Message<SZ, RO, I>, Error<S::Error>> {
        self.connection.read_message(&mut self.timer, self.timeout)
    }
}
