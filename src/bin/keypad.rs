//! STM32F103 Blue Pill Two-Key Counter with OLED Display
//! =============================================================================================
//!
//! Date			Author          Notes
//! 09/10/2025	    YHY             Initial release
//!
//!==============================================================================================
//!
//! Releasing K1 adds 1 to the counter, releasing K2 adds 10. Keys are scanned
//! every 20 ms from a 1 ms ticker task; the OLED shows the counter and a loop
//! counter so refresh activity is visible.
//!
//! Hardware Connections:
//!   OLED Display -> Blue Pill
//!      SDA  -> PB7
//!      SCL  -> PB6
//!
//!   Keys (to GND, internal pull-up):
//!      K1   -> PA2
//!      K2   -> PA3

#![no_std]
#![no_main]

use core::fmt::Write;
use embassy_executor::Spawner;
use embassy_stm32::{
    bind_interrupts,
    gpio::{Input, Pull},
    i2c::{self, ErrorInterruptHandler, EventInterruptHandler},
    peripherals,
    time::Hertz,
};
use embassy_time::{Duration, Ticker};
use embedded_graphics::{
    mono_font::{MonoTextStyleBuilder, ascii::FONT_8X13},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use heapless::String;
use key_events::{Keypad, ReleasedKey, hardware::gpio_button::GpioButton};
use ssd1306::{I2CDisplayInterface, Ssd1306, prelude::*};
use {defmt_rtt as _, panic_probe as _}; // Logging and panic handlers

// Ticks per scan: 20 x 1 ms
const SAMPLE_DIVIDER: u16 = 20;

// Points added per key: K1 -> 1, K2 -> 10
const KEY_STEP: [u16; 2] = [1, 10];

static RELEASED_KEY: ReleasedKey = ReleasedKey::new();

type GpioKeypad = Keypad<'static, GpioButton<Input<'static>>, 2>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());

    bind_interrupts!(struct Irqs {
        I2C1_EV => EventInterruptHandler<peripherals::I2C1>;
        I2C1_ER => ErrorInterruptHandler<peripherals::I2C1>;
    });

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

    let keypad = Keypad::new(
        [
            GpioButton::new(Input::new(p.PA2, Pull::Up)),
            GpioButton::new(Input::new(p.PA3, Pull::Up)),
        ],
        &RELEASED_KEY,
        SAMPLE_DIVIDER,
    );

    spawner
        .spawn(keypad_tick(keypad, Duration::from_millis(1)))
        .unwrap();

    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().unwrap();

    let text_style = MonoTextStyleBuilder::new()
        .font(&FONT_8X13)
        .text_color(BinaryColor::On)
        .build();

    let mut count: u16 = 0;
    let mut frames: u16 = 0;
    let mut ticker = Ticker::every(Duration::from_millis(20));

    loop {
        if let Some(key) = RELEASED_KEY.take() {
            count = count.wrapping_add(KEY_STEP[key]);
            defmt::info!("K{} released, count = {}", key + 1, count);
        }

        display.clear_buffer();

        let mut line: String<16> = String::new();
        write!(&mut line, "count {:03}", count % 1000).unwrap();
        Text::with_baseline(&line, Point::new(0, 0), text_style, Baseline::Top)
            .draw(&mut display)
            .unwrap();

        line.clear();
        write!(&mut line, "frame {:05}", frames).unwrap();
        Text::with_baseline(&line, Point::new(0, 20), text_style, Baseline::Top)
            .draw(&mut display)
            .unwrap();

        display.flush().unwrap();
        frames = frames.wrapping_add(1);

        ticker.next().await;
    }
}

/// Keypad Scan Task
#[embassy_executor::task]
async fn keypad_tick(mut keypad: GpioKeypad, period: Duration) {
    let mut ticker = Ticker::every(period);
    loop {
        keypad.tick();
        ticker.next().await;
    }
}
