use super::{Layer, LayerState, Report};

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct KeyboardState<L: Layer> {
    /// Highest active layer.
    pub layer: L,
    pub layers: LayerState,
    pub report: Report,
}
