use super::traits::Led;
use embedded_hal::digital::StatefulOutputPin;

// Active-low, like the Blue Pill's PC13 LED.
pub struct GpioLed<P> {
    pin: P,
}

impl<P: StatefulOutputPin> GpioLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: StatefulOutputPin> Led for GpioLed<P> {
    fn on(&mut self) {
        self.pin.set_low().ok();
    }

    fn off(&mut self) {
        self.pin.set_high().ok();
    }

    fn toggle(&mut self) {
        self.pin.toggle().ok();
    }
}
