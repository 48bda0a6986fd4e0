//! Layer indicator lighting: every LED shows the colour of the highest
//! active layer that has one.

use core::iter::repeat;

use smart_leds::hsv::{hsv2rgb, Hsv};
use smart_leds::{brightness, SmartLedsWrite, RGB8};

use crate::keyboard::LayerState;

pub const BLUE: Hsv = Hsv {
    hue: 170,
    sat: 255,
    val: 255,
};
pub const ORANGE: Hsv = Hsv {
    hue: 21,
    sat: 255,
    val: 255,
};
pub const GREEN: Hsv = Hsv {
    hue: 85,
    sat: 255,
    val: 255,
};
pub const CYAN: Hsv = Hsv {
    hue: 128,
    sat: 255,
    val: 255,
};

/// Index into `colors` of the highest active layer that has a colour.
pub fn lit_layer(layers: LayerState, colors: &[Hsv]) -> Option<usize> {
    layers
        .active()
        .map(usize::from)
        .find(|&layer| layer < colors.len())
}

pub struct LayerLighting<W: SmartLedsWrite<Color = RGB8>> {
    writer: W,
    colors: &'static [Hsv],
    led_count: usize,
    max_brightness: u8,
    shown: Option<usize>,
}

impl<W: SmartLedsWrite<Color = RGB8>> LayerLighting<W> {
    pub fn new(writer: W, colors: &'static [Hsv], led_count: usize, max_brightness: u8) -> Self {
        LayerLighting {
            writer,
            colors,
            led_count,
            max_brightness,
            shown: None,
        }
    }

    /// Rewrites the strip when the lit layer changed.
    pub fn update(&mut self, layers: LayerState) -> Result<(), W::Error> {
        let Some(layer) = lit_layer(layers, self.colors) else {
            return Ok(());
        };
        if self.shown == Some(layer) {
            return Ok(());
        }
        let color = hsv2rgb(self.colors[layer]);
        self.writer.write(brightness(
            repeat(color).take(self.led_count),
            self.max_brightness,
        ))?;
        self.shown = Some(layer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLORS: [Hsv; 4] = [BLUE, ORANGE, GREEN, CYAN];

    #[derive(Default)]
    struct Strip {
        writes: Vec<Vec<RGB8>>,
    }

    impl SmartLedsWrite for &mut Strip {
        type Error = ();
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), ()>
        where
            T: IntoIterator<Item = I>,
            I: Into<RGB8>,
        {
            self.writes
                .push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    #[test]
    fn highest_colored_layer_wins() {
        let mut layers = LayerState::default();
        assert_eq!(lit_layer(layers, &COLORS), Some(0));
        layers.on(1);
        layers.on(2);
        assert_eq!(lit_layer(layers, &COLORS), Some(2));
        layers.on(7);
        assert_eq!(lit_layer(layers, &COLORS), Some(2));
    }

    #[test]
    fn writes_only_on_change_and_limits_brightness() {
        let mut strip = Strip::default();
        let mut lighting = LayerLighting::new(&mut strip, &COLORS, 3, 120);
        let mut layers = LayerState::default();
        lighting.update(layers).unwrap();
        lighting.update(layers).unwrap();
        layers.on(3);
        lighting.update(layers).unwrap();
        drop(lighting);

        assert_eq!(strip.writes.len(), 2);
        assert_eq!(strip.writes[0].len(), 3);
        assert!(strip.writes[0]
            .iter()
            .all(|c| c.r <= 120 && c.g <= 120 && c.b <= 120));
        assert!(strip.writes[0][0].b > strip.writes[0][0].r);
        assert_ne!(strip.writes[0][0], strip.writes[1][0]);
    }
}
