use core::fmt;

/// Millisecond timing options of a key.
///
/// Converted once into tick counts with [`KeyConfig::timing`]; the classifier
/// itself only ever counts ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyConfig {
    /// Press duration before `Long` fires.
    pub long_press_ms: u32,
    /// Longest release gap for a second press to count as `Double`.
    pub double_click_window_ms: u32,
    /// Spacing between `Repeat` events while held after `Long`.
    pub repeat_interval_ms: u32,
    /// Ticks per debounce sample.
    pub sample_divider: u16,
    /// Period at which the caller invokes `tick()`.
    pub tick_period_ms: u32,
}

impl KeyConfig {
    /// 1 ms tick, one sample every 20 ms, 2 s long press, 200 ms double-click
    /// window, 100 ms repeat.
    pub const REFERENCE: Self = Self {
        long_press_ms: 2000,
        double_click_window_ms: 200,
        repeat_interval_ms: 100,
        sample_divider: 20,
        tick_period_ms: 1,
    };

    pub const fn with_long_press_ms(mut self, ms: u32) -> Self {
        self.long_press_ms = ms;
        self
    }

    pub const fn with_double_click_window_ms(mut self, ms: u32) -> Self {
        self.double_click_window_ms = ms;
        self
    }

    pub const fn with_repeat_interval_ms(mut self, ms: u32) -> Self {
        self.repeat_interval_ms = ms;
        self
    }

    pub const fn with_sample_divider(mut self, ticks: u16) -> Self {
        self.sample_divider = ticks;
        self
    }

    pub const fn with_tick_period_ms(mut self, ms: u32) -> Self {
        self.tick_period_ms = ms;
        self
    }

    /// Validate the options and convert every window into ticks.
    ///
    /// # Errors
    /// - [`ConfigError::ZeroTickPeriod`] / [`ConfigError::ZeroSampleDivider`]
    /// - [`ConfigError::WindowTooShort`] if a window is shorter than one tick
    /// - [`ConfigError::NotTickAligned`] if a window is not a whole number of ticks
    pub const fn timing(&self) -> Result<Timing, ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.sample_divider == 0 {
            return Err(ConfigError::ZeroSampleDivider);
        }
        let long_press = match to_ticks(self.long_press_ms, self.tick_period_ms, Window::LongPress) {
            Ok(ticks) => ticks,
            Err(e) => return Err(e),
        };
        let double_window = match to_ticks(
            self.double_click_window_ms,
            self.tick_period_ms,
            Window::DoubleClick,
        ) {
            Ok(ticks) => ticks,
            Err(e) => return Err(e),
        };
        let repeat_interval = match to_ticks(self.repeat_interval_ms, self.tick_period_ms, Window::Repeat) {
            Ok(ticks) => ticks,
            Err(e) => return Err(e),
        };
        Ok(Timing {
            long_press,
            double_window,
            repeat_interval,
            sample_divider: self.sample_divider,
        })
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self::REFERENCE
    }
}

const fn to_ticks(ms: u32, tick_period_ms: u32, window: Window) -> Result<u32, ConfigError> {
    if ms < tick_period_ms {
        return Err(ConfigError::WindowTooShort { window });
    }
    if ms % tick_period_ms != 0 {
        return Err(ConfigError::NotTickAligned { window });
    }
    Ok(ms / tick_period_ms)
}

/// Validated key timing, all values in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub(crate) long_press: u32,
    pub(crate) double_window: u32,
    pub(crate) repeat_interval: u32,
    pub(crate) sample_divider: u16,
}

impl Timing {
    /// [`KeyConfig::REFERENCE`] in ticks.
    pub const REFERENCE: Self = Self {
        long_press: 2000,
        double_window: 200,
        repeat_interval: 100,
        sample_divider: 20,
    };

    pub const fn long_press(&self) -> u32 {
        self.long_press
    }

    pub const fn double_window(&self) -> u32 {
        self.double_window
    }

    pub const fn repeat_interval(&self) -> u32 {
        self.repeat_interval
    }

    pub const fn sample_divider(&self) -> u16 {
        self.sample_divider
    }
}

impl TryFrom<KeyConfig> for Timing {
    type Error = ConfigError;

    fn try_from(config: KeyConfig) -> Result<Self, Self::Error> {
        config.timing()
    }
}

/// Which timing window a [`ConfigError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Window {
    LongPress,
    DoubleClick,
    Repeat,
}

impl Window {
    const fn name(self) -> &'static str {
        match self {
            Window::LongPress => "long press",
            Window::DoubleClick => "double-click window",
            Window::Repeat => "repeat interval",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    ZeroTickPeriod,
    ZeroSampleDivider,
    WindowTooShort { window: Window },
    NotTickAligned { window: Window },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTickPeriod => f.write_str("tick period must be non-zero"),
            ConfigError::ZeroSampleDivider => f.write_str("sample divider must be non-zero"),
            ConfigError::WindowTooShort { window } => {
                write!(f, "{} is shorter than one tick", window.name())
            }
            ConfigError::NotTickAligned { window } => {
                write!(f, "{} is not a multiple of the tick period", window.name())
            }
        }
    }
}

impl core::error::Error for ConfigError {}
