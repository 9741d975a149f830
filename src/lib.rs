//! Debounced multi-function key events for STM32F1 firmware.
//!
//! A [`Key`] is ticked from a fixed-period source (a timer interrupt or an
//! embassy `Ticker` task). Every `sample_divider` ticks it samples its pin,
//! runs the click/hold state machine and publishes flags into a
//! [`KeyEvents`] set, which the main loop polls with [`KeyEvents::check`].
//!
//! ```
//! use key_events::{Key, KeyConfig, KeyEvent, KeyEvents, hardware::traits::Button};
//!
//! struct Released;
//! impl Button for Released {
//!     fn is_pressed(&mut self) -> bool {
//!         false
//!     }
//! }
//!
//! static EVENTS: KeyEvents = KeyEvents::new();
//!
//! let timing = KeyConfig::default().timing().unwrap();
//! let mut key = Key::new(Released, &EVENTS, timing);
//! for _ in 0..100 {
//!     key.tick();
//! }
//! assert!(!EVENTS.check(KeyEvent::Single));
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod hardware;
pub mod key;

pub use key::config::{ConfigError, KeyConfig, Timing, Window};
pub use key::events::{EventSet, KeyEvent, KeyEvents};
pub use key::keypad::{Keypad, ReleasedKey};
pub use key::{Key, Phase};
