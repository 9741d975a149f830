use super::traits::Button;
use embedded_hal::digital::InputPin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    #[default]
    ActiveLow,
    ActiveHigh,
}

pub struct GpioButton<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> GpioButton<P> {
    pub fn new(pin: P) -> Self {
        Self::with_polarity(pin, Polarity::ActiveLow)
    }

    pub fn with_polarity(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: InputPin> Button for GpioButton<P> {
    fn is_pressed(&mut self) -> bool {
        let level = match self.polarity {
            Polarity::ActiveLow => self.pin.is_low(),
            Polarity::ActiveHigh => self.pin.is_high(),
        };
        match level {
            Ok(pressed) => pressed,
            // A failed read counts as released.
            Err(_) => {
                warn!("key pin read failed, treating as released");
                false
            }
        }
    }
}
