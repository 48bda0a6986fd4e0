use crate::{keyboard::KeySwitchIdentifier, Vec};

/// Frames on the split link. Switch lists are sent as a length byte
/// followed by each identifier's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<const SZ: usize, const RO: usize, SI: KeySwitchIdentifier<SZ>> {
    Switches(Vec<SI, RO>),      // 0x00
    SwitchesReply(Vec<SI, RO>), // 0x01
    Acknowledge,                // 0xfe
    FindReceiver,               // 0xff
}

impl<const SZ: usize, const RO: usize, SI: KeySwitchIdentifier<SZ>> Message<SZ, RO, SI> {
    pub(crate) fn head(&self) -> u8 {
        match self {
            Message::Switches(_) => 0x00,
            Message::SwitchesReply(_) => 0x01,
            Message::Acknowledge => 0xfe,
            Message::FindReceiver => 0xff,
        }
    }
}
