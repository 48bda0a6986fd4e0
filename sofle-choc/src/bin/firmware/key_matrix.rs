use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};
use rp2040_hal::gpio::{DynPinId, FunctionSioInput, FunctionSioOutput, Pin, PullDown, PullUp};
use sofle_choc::{board::MATRIX_SETTLE_MICROS, KeySwitchIdentifier};
use sofle_kbd::{
    encoder::{QuadratureDecoder, RotaryEncoder, ENCODER_RESOLUTION},
    keyboard, Vec,
};

pub type RowPin = Pin<DynPinId, FunctionSioOutput, PullDown>;
pub type ColPin = Pin<DynPinId, FunctionSioInput, PullUp>;

fn is_low(pin: &mut ColPin) -> bool {
    matches!(pin.is_low(), Ok(true))
}

/// Switch matrix of one half, diodes from column to row, plus its encoder.
/// Rows are driven low one at a time and pressed switches pull their column
/// low.
pub struct KeyMatrix<D: DelayNs, const ROWS: usize, const COLS: usize> {
    rows: [RowPin; ROWS],
    cols: [ColPin; COLS],
    encoder_pins: (ColPin, ColPin),
    encoder: RotaryEncoder<KeySwitchIdentifier>,
    delay: D,
}

impl<D: DelayNs, const ROWS: usize, const COLS: usize> KeyMatrix<D, ROWS, COLS> {
    pub fn new(
        mut rows: [RowPin; ROWS],
        cols: [ColPin; COLS],
        mut encoder_pins: (ColPin, ColPin),
        delay: D,
    ) -> Self {
        for pin in rows.iter_mut() {
            pin.set_high().ok();
        }
        let decoder = QuadratureDecoder::new(
            ENCODER_RESOLUTION,
            is_low(&mut encoder_pins.0),
            is_low(&mut encoder_pins.1),
        );
        KeyMatrix {
            rows,
            cols,
            encoder_pins,
            encoder: RotaryEncoder::new(
                decoder,
                KeySwitchIdentifier::counter_clockwise(),
                KeySwitchIdentifier::clockwise(),
            ),
            delay,
        }
    }

    fn sample_encoder(&mut self) {
        let a = is_low(&mut self.encoder_pins.0);
        let b = is_low(&mut self.encoder_pins.1);
        self.encoder.update(a, b);
    }
}

impl<D: DelayNs, const ROWS: usize, const COLS: usize> keyboard::KeySwitches<2, 16>
    for KeyMatrix<D, ROWS, COLS>
{
    type Identifier = KeySwitchIdentifier;

    fn scan(&mut self) -> Vec<Self::Identifier, 16> {
        let mut keys = Vec::<Self::Identifier, 16>::new();
        for row in 0..ROWS {
            self.rows[row].set_low().ok();
            self.delay.delay_us(MATRIX_SETTLE_MICROS);
            for col in 0..COLS {
                if is_low(&mut self.cols[col]) {
                    keys.push(KeySwitchIdentifier::from_matrix(row as u8, col as u8))
                        .ok();
                }
            }
            self.rows[row].set_high().ok();
            self.sample_encoder();
        }
        if let Some(turn) = self.encoder.scan() {
            keys.push(turn).ok();
        }
        keys
    }
}
