#[cfg(feature = "defmt")]
use defmt::Format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum SplitState {
    /// No handshake yet.
    Undetermined,
    /// Sends its switches and reads the other half's in reply.
    Controller,
    /// Answers the controller's requests.
    Receiver,
}
