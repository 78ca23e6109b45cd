//! Display control module for PineTime

use analog_watchface::{config::CANVAS_SIZE, FrameBuffer};
use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;
use embedded_graphics::{
    pixelcolor::{BinaryColor, Rgb565},
    prelude::*,
    primitives::Rectangle,
};
use mipidsi::{models::ST7789, Builder, Orientation};

use super::backlight::{Backlight, DEFAULT_BRIGHTNESS};

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

/// Top left corner of the face canvas, centered on the panel
const CANVAS_ORIGIN: Point = Point::new(
    (LCD_W as i32 - CANVAS_SIZE.width as i32) / 2,
    (LCD_H as i32 - CANVAS_SIZE.height as i32) / 2,
);

type Lcd<SPI> = mipidsi::Display<
    SPIInterface<Spim<'static, SPI>, Output<'static, P0_18>, Output<'static, P0_25>>,
    ST7789,
    Output<'static, P0_26>,
>;

pub struct Display<SPI>
where
    SPI: spim::Instance,
{
    /// ST7789 panel
    lcd: Lcd<SPI>,
    /// Backlight pins
    backlight: Backlight,
}

impl<SPI> Display<SPI>
where
    SPI: spim::Instance,
{
    /// Configure display settings on boot
    pub fn init(
        spim: Spim<'static, SPI>,
        cs_pin: Output<'static, P0_25>,
        dc_pin: Output<'static, P0_18>,
        rst_pin: Output<'static, P0_26>,
        backlight: Backlight,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;

        Ok(Self { lcd, backlight })
    }

    /// Clear the panel and light it up
    pub fn wake(&mut self) -> Result<(), Error> {
        self.lcd.clear(Rgb565::BLACK).map_err(|_| Error::Transfer)?;
        self.backlight
            .set(DEFAULT_BRIGHTNESS)
            .map_err(|_| Error::Backlight)?;
        defmt::debug!("Display on, brightness {}", self.backlight.brightness());
        Ok(())
    }

    /// Switch the backlight off
    pub fn sleep(&mut self) {
        self.backlight.off();
    }

    /// Blit a rendered face to the center of the panel
    pub fn show(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        let area = Rectangle::new(CANVAS_ORIGIN, CANVAS_SIZE);
        let colors = frame.colors().map(|color| match color {
            BinaryColor::On => Rgb565::WHITE,
            BinaryColor::Off => Rgb565::BLACK,
        });
        self.lcd
            .fill_contiguous(&area, colors)
            .map_err(|_| Error::Transfer)
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Panel did not respond to the init sequence
    Init,
    /// SPI transfer failed
    Transfer,
    Backlight,
}
