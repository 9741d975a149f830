//! Multi-function key: single, double, long press and auto-repeat from one line.

pub mod config;
pub mod events;
pub mod keypad;

use crate::hardware::traits::Button;
use config::Timing;
use events::{KeyEvent, KeyEvents};

/// Phase of the click state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Released, no interaction in progress.
    Idle,
    /// Down, long-press countdown running.
    Pressed,
    /// Released after a short press, double-click window running.
    AwaitingDouble,
    /// Second press of a double click, waiting for its release.
    DoubleConfirmed,
    /// Held past the long-press threshold, repeat countdown running.
    Repeating,
}

/// Debounce sampler and click classifier for a single key.
///
/// Call [`tick`](Self::tick) at the configured tick period. Events are
/// published into the borrowed [`KeyEvents`] and read from anywhere with
/// [`KeyEvents::check`]. Each key owns its whole state, so any number of keys
/// can run side by side, each with its own `KeyEvents`.
pub struct Key<'a, B> {
    button: B,
    events: &'a KeyEvents,
    timing: Timing,
    phase: Phase,
    /// Ticks left in the current phase window.
    countdown: u32,
    divider: u16,
    pressed: bool,
}

impl<'a, B: Button> Key<'a, B> {
    pub fn new(button: B, events: &'a KeyEvents, timing: Timing) -> Self {
        Self {
            button,
            events,
            timing,
            phase: Phase::Idle,
            countdown: 0,
            divider: 0,
            pressed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Pin state seen by the most recent sampling cycle.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn events(&self) -> &'a KeyEvents {
        self.events
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Advance by one tick. Constant time, no allocation, safe in an ISR.
    pub fn tick(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);

        self.divider += 1;
        if self.divider < self.timing.sample_divider {
            return;
        }
        self.divider = 0;
        self.sample();
    }

    fn sample(&mut self) {
        let pressed = self.button.is_pressed();

        self.events.set_hold(pressed);
        if pressed && !self.pressed {
            self.emit(KeyEvent::Down);
        } else if !pressed && self.pressed {
            self.emit(KeyEvent::Up);
        }

        self.step(pressed);
        self.pressed = pressed;
    }

    /// The only place `phase` changes.
    fn step(&mut self, pressed: bool) {
        let expired = self.countdown == 0;
        let next = match self.phase {
            Phase::Idle if pressed => {
                self.countdown = self.timing.long_press;
                Phase::Pressed
            }
            // A release seen on the very cycle the long-press window expires
            // wins over the expiry: the press counts as short and no Long fires.
            Phase::Pressed if !pressed => {
                self.countdown = self.timing.double_window;
                Phase::AwaitingDouble
            }
            Phase::Pressed if expired => {
                self.emit(KeyEvent::Long);
                self.countdown = self.timing.repeat_interval;
                Phase::Repeating
            }
            Phase::AwaitingDouble if pressed => {
                self.emit(KeyEvent::Double);
                Phase::DoubleConfirmed
            }
            Phase::AwaitingDouble if expired => {
                self.emit(KeyEvent::Single);
                Phase::Idle
            }
            Phase::DoubleConfirmed | Phase::Repeating if !pressed => Phase::Idle,
            Phase::Repeating if expired => {
                self.emit(KeyEvent::Repeat);
                self.countdown = self.timing.repeat_interval;
                Phase::Repeating
            }
            phase => phase,
        };
        if next != self.phase {
            trace!("key phase {} -> {}", self.phase, next);
            self.phase = next;
        }
    }

    fn emit(&self, event: KeyEvent) {
        debug!("key event {}", event);
        self.events.raise(event);
    }
}
