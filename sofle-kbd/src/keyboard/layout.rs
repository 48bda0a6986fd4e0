use super::{Action, Combo, KeySwitchIdentifier, Layer, TapDance};

pub trait Layout<const SZ: usize> {
    type Identifier: KeySwitchIdentifier<SZ>;
    type Layer: Layer;

    /// The action in `switch`'s slot on `layer`, which may be
    /// `Action::Transparent`.
    fn action(&self, layer: Self::Layer, switch: &Self::Identifier) -> Action;

    fn tap_dance(&self, _index: u8) -> Option<&TapDance> {
        None
    }

    fn combos(&self) -> &[Combo] {
        &[]
    }
}
