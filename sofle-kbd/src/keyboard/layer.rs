#[cfg(feature = "defmt")]
use defmt::Format;

pub use sofle_kbd_macros::Layer;

/// A named layer of a layout. `#[derive(Layer)]` numbers the variants of a
/// fieldless enum in declaration order, starting at 0.
pub trait Layer: Copy + Eq + Default {
    fn index(&self) -> u8;
    fn from_index(index: u8) -> Option<Self>;
}

/// Which layers are on. Layer 0 is always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct LayerState(u32);

impl LayerState {
    pub const MAX_LAYERS: u8 = 32;

    /// Layers turned on above the base layer.
    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_on(&self, layer: u8) -> bool {
        layer == 0 || (layer < Self::MAX_LAYERS && self.0 & (1 << layer) != 0)
    }

    pub fn on(&mut self, layer: u8) {
        if layer > 0 && layer < Self::MAX_LAYERS {
            self.0 |= 1 << layer;
        }
    }

    pub fn off(&mut self, layer: u8) {
        if layer < Self::MAX_LAYERS {
            self.0 &= !(1 << layer);
        }
    }

    pub fn invert(&mut self, layer: u8) {
        if layer > 0 && layer < Self::MAX_LAYERS {
            self.0 ^= 1 << layer;
        }
    }

    pub fn highest(&self) -> u8 {
        if self.0 == 0 {
            0
        } else {
            (31 - self.0.leading_zeros()) as u8
        }
    }

    /// Active layers from the top down, ending with layer 0.
    pub fn active(&self) -> impl Iterator<Item = u8> {
        let state = *self;
        (0..Self::MAX_LAYERS).rev().filter(move |l| state.is_on(*l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Layer)]
    enum TestLayer {
        #[default]
        Base,
        Upper,
        Extra,
    }

    #[test]
    fn derive_numbers_variants() {
        assert_eq!(TestLayer::Base.index(), 0);
        assert_eq!(TestLayer::Extra.index(), 2);
        assert_eq!(TestLayer::from_index(1), Some(TestLayer::Upper));
        assert_eq!(TestLayer::from_index(3), None);
    }

    #[test]
    fn base_layer_is_always_on() {
        let mut state = LayerState::default();
        assert!(state.is_on(0));
        state.off(0);
        assert!(state.is_on(0));
        assert_eq!(state.highest(), 0);
        assert_eq!(state.active().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn highest_and_active_order() {
        let mut state = LayerState::default();
        state.on(1);
        state.on(3);
        assert_eq!(state.highest(), 3);
        assert_eq!(state.active().collect::<Vec<_>>(), vec![3, 1, 0]);
        state.invert(3);
        assert_eq!(state.highest(), 1);
        state.off(1);
        assert_eq!(state.bits(), 0);
    }
}
