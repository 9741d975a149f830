//! STM32F103 Blue Pill Multi-Function Key Demo with OLED Display
//! =============================================================================================
//!
//! Date			Author          Notes
//! 09/10/2025	    YHY             Initial release
//!
//!==============================================================================================
//!
//! Two keys are classified into hold / down / up / single / double / long /
//! repeat events. A 1 ms ticker task drives the classifiers, the main loop
//! polls the events, and the per-event counters are shown on the OLED.
//!
//! Hardware Connections:
//!   OLED Display -> Blue Pill
//!      GND  -> GND
//!      VCC  -> 5V
//!      SDA  -> PB7
//!      SCL  -> PB6
//!
//!   Keys (to GND, internal pull-up):
//!      K1   -> PA2
//!      K2   -> PA3
//!
//! Behaviour:
//! 1. Onboard LED (PC13) is lit while K1 is held
//! 2. Every event is logged over defmt RTT
//! 3. OLED shows single / double / long / repeat counts for both keys

#![no_std]
#![no_main]

use core::fmt::Write;
use defmt_rtt as _; // Global logger
use embassy_executor::Spawner;
use embassy_stm32::{
    bind_interrupts,
    gpio::{Input, Level, Output, Pull, Speed},
    i2c::{self, ErrorInterruptHandler, EventInterruptHandler},
    peripherals,
    time::Hertz,
};
use embassy_sync::{
    blocking_mutex::raw::ThreadModeRawMutex,
    channel::{Channel, Receiver, Sender},
};
use embassy_time::{Duration, Ticker};
use embedded_graphics::{
    mono_font::{MonoTextStyleBuilder, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use heapless::String;
use key_events::{
    Key, KeyConfig, KeyEvent, KeyEvents, Timing,
    hardware::{gpio_button::GpioButton, gpio_led::GpioLed, traits::Led},
};
use panic_probe as _; // Panic handler
use ssd1306::{I2CDisplayInterface, Ssd1306, prelude::*};

const KEY_COUNT: usize = 2;

// 1 ms tick, 20 ms sampling, 2 s long press, 200 ms double click, 100 ms repeat
const TIMING: Timing = match KeyConfig::REFERENCE.timing() {
    Ok(timing) => timing,
    Err(_) => panic!("invalid key timing"),
};

// Event flags of each key, written by the tick task and read by the main loop
static KEY_EVENTS: [KeyEvents; KEY_COUNT] = [const { KeyEvents::new() }; KEY_COUNT];

// Counter snapshots for the display task
static COUNT_CHANNEL: Channel<ThreadModeRawMutex, Counters, 1> = Channel::new();

type GpioKey = Key<'static, GpioButton<Input<'static>>>;

/// Per-key event counters shown on the display
#[derive(Clone, Copy, Default, PartialEq)]
struct Counters {
    single: [u16; KEY_COUNT],
    double: [u16; KEY_COUNT],
    long: [u16; KEY_COUNT],
    repeat: [u16; KEY_COUNT],
    held: [bool; KEY_COUNT],
}

impl Counters {
    fn record(&mut self, key: usize, event: KeyEvent) {
        let slot = match event {
            KeyEvent::Single => &mut self.single[key],
            KeyEvent::Double => &mut self.double[key],
            KeyEvent::Long => &mut self.long[key],
            KeyEvent::Repeat => &mut self.repeat[key],
            _ => return,
        };
        *slot = slot.wrapping_add(1);
    }
}

/// Main application entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Initialize peripherals with default configuration
    let p = embassy_stm32::init(Default::default());

    // Bind I2C interrupt handlers
    bind_interrupts!(struct Irqs {
        I2C1_EV => EventInterruptHandler<peripherals::I2C1>;
        I2C1_ER => ErrorInterruptHandler<peripherals::I2C1>;
    });

    // Configure I2C peripheral at 400kHz
    let i2c = i2c::I2c::new(
        p.I2C1,
        p.PB6,
        p.PB7,
        Irqs,
        p.DMA1_CH6,
        p.DMA1_CH7,
        Hertz::khz(400),
        Default::default(),
    );

    // Keys short to ground, so the internal pull-up keeps them high when released
    let keys: [GpioKey; KEY_COUNT] = [
        Key::new(GpioButton::new(Input::new(p.PA2, Pull::Up)), &KEY_EVENTS[0], TIMING),
        Key::new(GpioButton::new(Input::new(p.PA3, Pull::Up)), &KEY_EVENTS[1], TIMING),
    ];

    defmt::info!("key timing: {}", TIMING);

    spawner
        .spawn(key_tick(keys, Duration::from_millis(1)))
        .unwrap();

    spawner
        .spawn(oled_display(
            i2c,
            COUNT_CHANNEL.receiver(),
            Duration::from_millis(50), // Refresh every 50ms
        ))
        .unwrap();

    // Onboard LED (PC13) mirrors K1's hold level
    let led = GpioLed::new(Output::new(p.PC13, Level::High, Speed::Low));

    poll_events(led, COUNT_CHANNEL.sender(), Duration::from_millis(5)).await;
}

/// Key Tick Task
///
/// The fixed-period tick source of the classifiers. Every tick advances all
/// keys; each key samples its pin on every 20th tick.
#[embassy_executor::task]
async fn key_tick(mut keys: [GpioKey; KEY_COUNT], period: Duration) {
    let mut ticker = Ticker::every(period);
    loop {
        for key in keys.iter_mut() {
            key.tick();
        }
        ticker.next().await;
    }
}

/// Event Polling Loop
///
/// Responsibilities:
/// 1. Consume edge events of every key
/// 2. Drive the LED from K1's hold level
/// 3. Publish counter changes to the display task
async fn poll_events(
    mut led: GpioLed<Output<'static>>,
    count_sender: Sender<'static, ThreadModeRawMutex, Counters, 1>,
    delay: Duration,
) -> ! {
    let mut ticker = Ticker::every(delay);
    let mut counters = Counters::default();
    let mut shown = Counters::default();

    loop {
        for (index, events) in KEY_EVENTS.iter().enumerate() {
            for event in KeyEvent::ALL {
                if event.is_level() {
                    continue;
                }
                if events.check(event) {
                    defmt::info!("K{}: {}", index + 1, event);
                    counters.record(index, event);
                }
            }
            counters.held[index] = events.check(KeyEvent::Hold);
        }

        led.set(counters.held[0]);

        if counters != shown {
            count_sender.clear();
            count_sender.try_send(counters).ok();
            shown = counters;
        }

        ticker.next().await;
    }
}

/// OLED Display Rendering Task
///
/// Two rows per key: click counters, then long/repeat counters and a hold marker.
#[embassy_executor::task]
async fn oled_display(
    i2c: i2c::I2c<'static, embassy_stm32::mode::Async>,
    count_channel: Receiver<'static, ThreadModeRawMutex, Counters, 1>,
    delay: Duration,
) {
    let mut ticker = Ticker::every(delay);

    // Initialize display interface and controller
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();

    display.init().unwrap();

    let text_style = MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build();

    let mut counters = Counters::default();
    let mut dirty = true;

    loop {
        if let Ok(new_counters) = count_channel.try_receive() {
            counters = new_counters;
            dirty = true;
        }

        if dirty {
            display.clear_buffer();

            for key in 0..KEY_COUNT {
                let top = key as i32 * 32;

                let mut clicks: String<21> = String::new();
                write!(
                    &mut clicks,
                    "K{} S:{:<4} D:{:<4}",
                    key + 1,
                    counters.single[key],
                    counters.double[key]
                )
                .unwrap();
                Text::with_baseline(&clicks, Point::new(0, top), text_style, Baseline::Top)
                    .draw(&mut display)
                    .unwrap();

                let mut holds: String<21> = String::new();
                write!(
                    &mut holds,
                    "{} L:{:<4} R:{:<4}",
                    if counters.held[key] { '*' } else { ' ' },
                    counters.long[key],
                    counters.repeat[key]
                )
                .unwrap();
                Text::with_baseline(&holds, Point::new(0, top + 12), text_style, Baseline::Top)
                    .draw(&mut display)
                    .unwrap();
            }

            // Update physical display
            display.flush().unwrap();
            dirty = false;
        }

        ticker.next().await;
    }
}
