use core::sync::atomic::{AtomicU8, Ordering};

use crate::hardware::traits::Button;

/// Latch holding the most recently released key of a [`Keypad`].
#[derive(Debug, Default)]
pub struct ReleasedKey {
    // Key number, 1-based; 0 when empty.
    number: AtomicU8,
}

impl ReleasedKey {
    pub const fn new() -> Self {
        Self { number: AtomicU8::new(0) }
    }

    /// Zero-based index of the last released key, clearing the latch.
    pub fn take(&self) -> Option<usize> {
        match self.number.swap(0, Ordering::AcqRel) {
            0 => None,
            n => Some(usize::from(n) - 1),
        }
    }

    fn latch(&self, number: u8) {
        self.number.store(number, Ordering::Release);
    }
}

/// Scanner for a group of plain keys that reports which one was released.
///
/// Each sampling cycle the first pressed key in declaration order is the
/// active one. When the active key goes from some key to none, that key is
/// latched into [`ReleasedKey`]. Sliding from one key straight onto another
/// latches nothing.
pub struct Keypad<'a, B, const N: usize> {
    buttons: [B; N],
    released: &'a ReleasedKey,
    sample_divider: u16,
    divider: u16,
    active: u8,
}

impl<'a, B: Button, const N: usize> Keypad<'a, B, N> {
    pub fn new(buttons: [B; N], released: &'a ReleasedKey, sample_divider: u16) -> Self {
        const { assert!(N < u8::MAX as usize, "too many keys for an 8-bit key number") };
        Self {
            buttons,
            released,
            sample_divider: sample_divider.max(1),
            divider: 0,
            active: 0,
        }
    }

    /// Zero-based index of the key held at the last sample.
    pub fn active(&self) -> Option<usize> {
        match self.active {
            0 => None,
            n => Some(usize::from(n) - 1),
        }
    }

    pub fn tick(&mut self) {
        self.divider += 1;
        if self.divider < self.sample_divider {
            return;
        }
        self.divider = 0;

        let previous = self.active;
        self.active = self.scan();
        if previous != 0 && self.active == 0 {
            debug!("keypad: key {} released", previous);
            self.released.latch(previous);
        }
    }

    fn scan(&mut self) -> u8 {
        // N < 255 is asserted in `new`, so the key number fits.
        self.buttons
            .iter_mut()
            .position(|b| b.is_pressed())
            .map_or(0, |i| i as u8 + 1)
    }
}
