use embedded_hal_0_2::timer::CountDown;

use crate::{
    keyboard::KeySwitchIdentifier,
    split::{Error, Message},
    Loggable, Vec,
};

/// A byte stream to the other half.
pub trait Connection {
    type Error: 'static + Loggable;
    fn read_raw(&self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error>;

    fn write(&self, data: &[u8]);
}

/// Largest frame written or read at once.
const MAX_BUF_LEN: usize = 64;

pub trait ConnectionExt: Connection {
    fn read_message<C: CountDown, const SZ: usize, const RO: usize, SI: KeySwitchIdentifier<SZ>>(
        &self,
        timer: &mut C,
        timeout: impl Into<C::Time>,
    ) -> Result<Message<SZ, RO, SI>, Error<Self::Error>> {
        assert!(
            MAX_BUF_LEN >= 2 + SZ * RO,
            "MAX_BUF_LEN must hold RO identifiers of SZ bytes"
        );
        let mut buf = [0u8; MAX_BUF_LEN];
        self.read_with_timeout(&mut buf[..1], timer, timeout)?;
        let head = buf[0];
        match head {
            0x00 | 0x01 => {
                let ctor = if head == 0x00 {
                    Message::Switches
                } else {
                    Message::SwitchesReply
                };
                self.read_before_expiry(&mut buf[..1], timer)?;
                let len = buf[0] as usize;
                if len > RO {
                    return Err(Error::ReadBufferOverflow);
                }
                self.read_before_expiry(&mut buf[..(len * SZ)], timer)?;
                let keys = buf[..(len * SZ)]
                    .chunks_exact(SZ)
                    .map(|chunk| {
                        let mut b: [u8; SZ] = [0; SZ];
                        b.copy_from_slice(chunk);
                        SI::from(b)
                    })
                    .collect();
                Ok(ctor(keys))
            }
            0xff => Ok(Message::FindReceiver),
            0xfe => Ok(Message::Acknowledge),
            _ => Err(Error::UnknownMessage { head }),
        }
    }

    fn send_message<const SZ: usize, const RO: usize, SI: KeySwitchIdentifier<SZ>>(
        &self,
        message: Message<SZ, RO, SI>,
    ) {
        assert!(
            MAX_BUF_LEN >= 2 + SZ * RO,
            "MAX_BUF_LEN must hold RO identifiers of SZ bytes"
        );
        let head = message.head();
        match message {
            Message::Switches(keys) | Message::SwitchesReply(keys) => {
                let mut data = Vec::<u8, MAX_BUF_LEN>::new();
                // Capacity is checked above.
                let _ = data.push(head);
                let _ = data.push(keys.len() as u8);
                for key in keys {
                    let bytes: [u8; SZ] = key.into();
                    let _ = data.extend_from_slice(&bytes);
                }
                self.write(&data);
            }
            Message::Acknowledge | Message::FindReceiver => {
                self.write(&[head]);
            }
        }
    }

    fn read_with_timeout<C: CountDown>(
        &self,
        buffer: &mut [u8],
        timer: &mut C,
        timeout: impl Into<C::Time>,
    ) -> Result<(), Error<Self::Error>> {
        timer.start(timeout);
        self.read_before_expiry(buffer, timer)
    }

    /// Fills `buffer` unless the already started `timer` runs out first.
    fn read_before_expiry<C: CountDown>(
        &self,
        buffer: &mut [u8],
        timer: &mut C,
    ) -> Result<(), Error<Self::Error>> {
        let mut offset = 0;
        while offset != buffer.len() {
            if timer.wait().is_ok() {
                return Err(Error::ReadTimedOut);
            }
            offset += match self.read_raw(&mut buffer[offset..]) {
                Ok(bytes_read) => bytes_read,
                Err(nb::Error::Other(source)) => return Err(Error::ReadError { source }),
                Err(nb::Error::WouldBlock) => continue,
            }
        }
        Ok(())
    }
}

impl<T: Connection> ConnectionExt for T {}

#[cfg(test)]
pub(crate) mod tests {
    use core::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct Id(pub u8, pub u8);

    impl From<[u8; 2]> for Id {
        fn from(bytes: [u8; 2]) -> Self {
            Id(bytes[0], bytes[1])
        }
    }

    impl From<Id> for [u8; 2] {
        fn from(id: Id) -> Self {
            [id.0, id.1]
        }
    }

    impl KeySwitchIdentifier<2> for Id {}

    /// Reads come from `rx`, writes land in `tx`.
    #[derive(Default)]
    pub(crate) struct FakeConnection {
        pub rx: RefCell<VecDeque<u8>>,
        pub tx: RefCell<std::vec::Vec<u8>>,
    }

    impl Connection for FakeConnection {
        type Error = ();

        fn read_raw(&self, buffer: &mut [u8]) -> nb::Result<usize, ()> {
            let mut rx = self.rx.borrow_mut();
            if rx.is_empty() {
                return Err(nb::Error::WouldBlock);
            }
            let mut n = 0;
            while n < buffer.len() {
                match rx.pop_front() {
                    Some(byte) => buffer[n] = byte,
                    None => break,
                }
                n += 1;
            }
            Ok(n)
        }

        fn write(&self, data: &[u8]) {
            self.tx.borrow_mut().extend_from_slice(data);
        }
    }

    /// Expires after `limit` polls.
    pub(crate) struct FakeTimer {
        pub limit: usize,
        polls: usize,
    }

    impl FakeTimer {
        pub fn new(limit: usize) -> Self {
            FakeTimer { limit, polls: 0 }
        }
    }

    impl CountDown for FakeTimer {
        type Time = Duration;

        fn start<T: Into<Duration>>(&mut self, _count: T) {
            self.polls = 0;
        }

        fn wait(&mut self) -> nb::Result<(), void::Void> {
            self.polls += 1;
            if self.polls > self.limit {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    type Msg = Message<2, 4, Id>;

    fn timeout() -> Duration {
        Duration::millis(10)
    }

    #[test]
    fn switches_frame_layout() {
        let connection = FakeConnection::default();
        let keys = [Id(1, 2), Id(3, 4)].into_iter().collect();
        connection.send_message(Msg::SwitchesReply(keys));
        assert_eq!(connection.tx.borrow().as_slice(), &[0x01, 2, 1, 2, 3, 4]);
        connection.send_message(Msg::FindReceiver);
        connection.send_message(Msg::Acknowledge);
        assert_eq!(&connection.tx.borrow()[6..], &[0xff, 0xfe]);
    }

    #[test]
    fn reads_what_was_written() {
        let connection = FakeConnection::default();
        connection
            .rx
            .borrow_mut()
            .extend([0x00, 1, 5, 6, 0x00, 0, 0xfe]);
        let mut timer = FakeTimer::new(100);
        let first: Msg = connection.read_message(&mut timer, timeout()).unwrap();
        assert_eq!(first, Msg::Switches([Id(5, 6)].into_iter().collect()));
        let empty: Msg = connection.read_message(&mut timer, timeout()).unwrap();
        assert_eq!(empty, Msg::Switches(Vec::new()));
        let ack: Msg = connection.read_message(&mut timer, timeout()).unwrap();
        assert_eq!(ack, Msg::Acknowledge);
    }

    #[test]
    fn malformed_frames_are_errors() {
        let connection = FakeConnection::default();
        connection.rx.borrow_mut().extend([0x42, 0x01, 9]);
        let mut timer = FakeTimer::new(100);
        let unknown: Result<Msg, _> = connection.read_message(&mut timer, timeout());
        assert!(matches!(unknown, Err(Error::UnknownMessage { head: 0x42 })));
        let overflow: Result<Msg, _> = connection.read_message(&mut timer, timeout());
        assert!(matches!(overflow, Err(Error::ReadBufferOverflow)));
    }

    #[test]
    fn frame_cut_after_header_times_out() {
        let connection = FakeConnection::default();
        connection.rx.borrow_mut().push_back(0x01);
        let mut timer = FakeTimer::new(3);
        let result: Result<Msg, _> = connection.read_message(&mut timer, timeout());
        assert!(matches!(result, Err(Error::ReadTimedOut)));

        connection.rx.borrow_mut().extend([0x00, 2, 7]);
        let result: Result<Msg, _> = connection.read_message(&mut timer, timeout());
        assert!(matches!(result, Err(Error::ReadTimedOut)));
    }

    #[test]
    fn silence_times_out() {
        let connection = FakeConnection::default();
        let mut timer = FakeTimer::new(3);
        let result: Result<Msg, _> = connection.read_message(&mut timer, timeout());
        assert!(matches!(result, Err(Error::ReadTimedOut)));
    }
}
