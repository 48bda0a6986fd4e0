use fugit::HertzU32;
use rp2040_hal::{
    gpio::{bank0::Gpio4, FunctionPio0, Pin, PullDown},
    pac::{PIO0, RESETS},
    pio::{PIOExt, SM0},
};
use sofle_choc::{
    board::{LED_COUNT, MAX_BRIGHTNESS},
    keymap::LAYER_COLORS,
};
use sofle_kbd::rgb::LayerLighting;
use ws2812_pio::Ws2812Direct;

pub type LedPin = Pin<Gpio4, FunctionPio0, PullDown>;
pub type Leds = LayerLighting<Ws2812Direct<PIO0, SM0, LedPin>>;

/// The LED strip of this half, driven by the first state machine of PIO0.
pub fn layer_leds(pio0: PIO0, pin: LedPin, resets: &mut RESETS, clock: HertzU32) -> Leds {
    let (mut pio, sm0, _, _, _) = pio0.split(resets);
    LayerLighting::new(
        Ws2812Direct::new(pin, &mut pio, sm0, clock),
        &LAYER_COLORS,
        LED_COUNT,
        MAX_BRIGHTNESS,
    )
}
