use core::fmt::Debug;

#[cfg(feature = "defmt")]
use defmt::Format;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Error<E: 'static + Debug> {
    ReadTimedOut,
    ReadBufferOverflow,
    ReadError {
        #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
        source: E,
    },
    UnknownMessage {
        head: u8,
    },
}
