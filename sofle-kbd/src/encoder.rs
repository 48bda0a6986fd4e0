//! Rotary encoders. A quadrature decoder counts pulses, and every full
//! detent becomes a short press of a virtual switch.

#[cfg(feature = "defmt")]
use defmt::Format;
use heapless::Deque;

use crate::log;

/// Pulses per detent of the encoders on the board.
pub const ENCODER_RESOLUTION: i8 = 4;

/// Detents remembered between two scans.
const MAX_PENDING_DETENTS: usize = 8;

/// Change in position for each (previous, current) pair of pin states,
/// indexed by `previous << 2 | current`.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Direction {
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadratureDecoder {
    state: u8,
    pulses: i8,
    resolution: i8,
}

impl QuadratureDecoder {
    /// `a` and `b` are the pin levels at start-up.
    pub fn new(resolution: i8, a: bool, b: bool) -> Self {
        QuadratureDecoder {
            state: Self::pins(a, b),
            pulses: 0,
            resolution,
        }
    }

    fn pins(a: bool, b: bool) -> u8 {
        (a as u8) | ((b as u8) << 1)
    }

    /// Feeds the current pin levels. Returns a direction once a full detent
    /// has been turned.
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        self.state = ((self.state << 2) | Self::pins(a, b)) & 0x0f;
        self.pulses += TRANSITIONS[self.state as usize];
        if self.pulses >= self.resolution {
            self.pulses %= self.resolution;
            Some(Direction::CounterClockwise)
        } else if self.pulses <= -self.resolution {
            self.pulses %= self.resolution;
            Some(Direction::Clockwise)
        } else {
            None
        }
    }
}

/// An encoder whose detents show up as presses of two virtual switches,
/// one per direction. Each press lasts exactly one scan and is followed by
/// a scan with the switch released.
#[derive(Debug)]
pub struct RotaryEncoder<I> {
    decoder: QuadratureDecoder,
    counter_clockwise: I,
    clockwise: I,
    pending: Deque<Direction, MAX_PENDING_DETENTS>,
    reported: bool,
}

impl<I: Copy> RotaryEncoder<I> {
    pub fn new(decoder: QuadratureDecoder, counter_clockwise: I, clockwise: I) -> Self {
        RotaryEncoder {
            decoder,
            counter_clockwise,
            clockwise,
            pending: Deque::new(),
            reported: false,
        }
    }

    /// Samples the pins. Call this more often than the switches are scanned.
    pub fn update(&mut self, a: bool, b: bool) {
        if let Some(direction) = self.decoder.update(a, b) {
            if self.pending.push_back(direction).is_err() {
                log::warn!("encoder turned faster than it is scanned");
            }
        }
    }

    /// The virtual switch that is down during this scan, if any.
    pub fn scan(&mut self) -> Option<I> {
        if self.reported {
            self.reported = false;
            return None;
        }
        let direction = self.pending.pop_front()?;
        self.reported = true;
        Some(match direction {
            Direction::CounterClockwise => self.counter_clockwise,
            Direction::Clockwise => self.clockwise,
        })
    }
}
