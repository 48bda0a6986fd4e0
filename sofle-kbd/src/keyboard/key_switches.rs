use core::hash::Hash;

use crate::Vec;

pub trait KeySwitches<const SZ: usize, const RO: usize> {
    type Identifier: KeySwitchIdentifier<SZ>;
    fn scan(&mut self) -> Vec<Self::Identifier, RO>;
}

/// A physical (or virtual) switch. The byte form is what travels over the
/// split link.
pub trait KeySwitchIdentifier<const SZ: usize>:
    Copy + Eq + From<[u8; SZ]> + Into<[u8; SZ]> + Hash
{
}
