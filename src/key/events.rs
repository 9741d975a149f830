use core::sync::atomic::{AtomicU8, Ordering};

/// One kind of key event.
///
/// `Hold` is a level that follows the sampled pin state; every other kind is
/// an edge that stays set until consumed by [`KeyEvents::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeyEvent {
    Hold = 0x01,
    Down = 0x02,
    Up = 0x04,
    Single = 0x08,
    Double = 0x10,
    Long = 0x20,
    Repeat = 0x40,
}

impl KeyEvent {
    pub const ALL: [KeyEvent; 7] = [
        KeyEvent::Hold,
        KeyEvent::Down,
        KeyEvent::Up,
        KeyEvent::Single,
        KeyEvent::Double,
        KeyEvent::Long,
        KeyEvent::Repeat,
    ];

    pub const fn bit(self) -> u8 {
        self as u8
    }

    pub const fn is_level(self) -> bool {
        matches!(self, KeyEvent::Hold)
    }
}

const EDGE_MASK: u8 = 0x7e;

/// Copy of a key's flags at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventSet(u8);

impl EventSet {
    pub const EMPTY: Self = Self(0);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & (EDGE_MASK | KeyEvent::Hold.bit()))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, event: KeyEvent) -> bool {
        self.0 & event.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn with(self, event: KeyEvent) -> Self {
        Self(self.0 | event.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = KeyEvent> {
        KeyEvent::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

impl FromIterator<KeyEvent> for EventSet {
    fn from_iter<I: IntoIterator<Item = KeyEvent>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Flags shared between the ticking context and the polling loop.
///
/// Every update is a single atomic read-modify-write, so a flag raised by
/// the tick interrupt is never lost to a concurrent consume, and vice versa.
/// Meant to live in a `static`.
#[derive(Debug, Default)]
pub struct KeyEvents {
    flags: AtomicU8,
}

impl KeyEvents {
    pub const fn new() -> Self {
        Self { flags: AtomicU8::new(0) }
    }

    /// Whether `event` is pending. Edge events are consumed by a successful
    /// check; `Hold` is left untouched.
    ///
    /// The selector is a single [`KeyEvent`], so asking for several events at
    /// once is not expressible; check them one at a time.
    pub fn check(&self, event: KeyEvent) -> bool {
        let bit = event.bit();
        if event.is_level() {
            self.flags.load(Ordering::Acquire) & bit != 0
        } else {
            self.flags.fetch_and(!bit, Ordering::AcqRel) & bit != 0
        }
    }

    /// Like [`check`](Self::check) but never consumes.
    pub fn peek(&self, event: KeyEvent) -> bool {
        self.flags.load(Ordering::Acquire) & event.bit() != 0
    }

    pub fn snapshot(&self) -> EventSet {
        EventSet(self.flags.load(Ordering::Acquire))
    }

    /// Drop every pending edge event. `Hold` keeps tracking the pin.
    pub fn clear(&self) {
        self.flags.fetch_and(!EDGE_MASK, Ordering::AcqRel);
    }

    pub(crate) fn raise(&self, event: KeyEvent) {
        self.flags.fetch_or(event.bit(), Ordering::AcqRel);
    }

    pub(crate) fn set_hold(&self, held: bool) {
        let bit = KeyEvent::Hold.bit();
        if held {
            self.flags.fetch_or(bit, Ordering::AcqRel);
        } else {
            self.flags.fetch_and(!bit, Ordering::AcqRel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_events_fire_once() {
        let events = KeyEvents::new();
        events.raise(KeyEvent::Down);
        events.raise(KeyEvent::Single);

        assert!(events.check(KeyEvent::Down));
        assert!(!events.check(KeyEvent::Down));
        assert!(events.peek(KeyEvent::Single));
        assert!(events.check(KeyEvent::Single));
        assert!(!events.check(KeyEvent::Single));
    }

    #[test]
    fn hold_is_not_consumed() {
        let events = KeyEvents::new();
        events.set_hold(true);
        assert!(events.check(KeyEvent::Hold));
        assert!(events.check(KeyEvent::Hold));
        events.set_hold(false);
        assert!(!events.check(KeyEvent::Hold));
    }

    #[test]
    fn checking_unset_flag_changes_nothing() {
        let events = KeyEvents::new();
        events.raise(KeyEvent::Up);
        assert!(!events.check(KeyEvent::Double));
        assert_eq!(events.snapshot(), EventSet::EMPTY.with(KeyEvent::Up));
    }

    #[test]
    fn clear_keeps_hold() {
        let events = KeyEvents::new();
        events.set_hold(true);
        events.raise(KeyEvent::Long);
        events.raise(KeyEvent::Repeat);
        events.clear();
        assert_eq!(events.snapshot(), EventSet::EMPTY.with(KeyEvent::Hold));
    }

    #[test]
    fn event_set_iterates_in_flag_order() {
        let set: EventSet = [KeyEvent::Repeat, KeyEvent::Hold, KeyEvent::Down]
            .into_iter()
            .collect();
        let mut iter = set.iter();
        assert_eq!(iter.next(), Some(KeyEvent::Hold));
        assert_eq!(iter.next(), Some(KeyEvent::Down));
        assert_eq!(iter.next(), Some(KeyEvent::Repeat));
        assert_eq!(iter.next(), None);
        assert_eq!(EventSet::from_bits(0xff).bits(), 0x7f);
    }

    #[test]
    fn concurrent_raise_and_consume_lose_nothing() {
        use std::sync::Arc;
        use std::thread;

        const ROUNDS: usize = 10_000;
        let events = Arc::new(KeyEvents::new());
        let producer = {
            let events = Arc::clone(&events);
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    events.raise(KeyEvent::Repeat);
                    events.set_hold(true);
                    events.set_hold(false);
                }
            })
        };
        // Long is raised once up front and must survive every Repeat consume.
        events.raise(KeyEvent::Long);
        for _ in 0..ROUNDS {
            events.check(KeyEvent::Repeat);
        }
        producer.join().unwrap();
        assert!(events.check(KeyEvent::Long));
    }
}
