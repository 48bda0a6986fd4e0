//! Monotonic time as seen by the key pipeline.
//!
//! The RP2040 timer counts microseconds in 64 bits, so the whole crate uses
//! the same representation.

pub type Instant = fugit::TimerInstantU64<1_000_000>;
pub type Duration = fugit::MicrosDurationU64;
