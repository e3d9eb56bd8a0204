//! LED strip abstraction and drivers.
//!
//! The render sink contract: a strip accepts per-pixel colors, a flush,
//! and a clear. Frames shorter than the strip leave the tail unset; longer
//! frames are truncated. Channels are clamped defensively on the way in.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SkystripError};
use crate::ramp::ColorStop;

/// Trait for addressable LED strip drivers
pub trait LedStrip {
    /// Number of physical LEDs on the strip
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stage the color of one LED; takes effect on the next [`flush`](Self::flush)
    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<()>;

    /// Transmit the staged colors to the hardware
    fn flush(&mut self) -> Result<()>;

    /// Turn every LED off immediately
    fn clear(&mut self) -> Result<()>;
}

/// Render one frame onto a strip.
///
/// Clamps every stop to 0-255, ignores frame entries beyond the strip
/// length, and leaves LEDs beyond the frame length unset.
pub fn send(strip: &mut dyn LedStrip, frame: &[ColorStop]) -> Result<()> {
    let count = frame.len().min(strip.len());
    for (i, stop) in frame.iter().take(count).enumerate() {
        let [r, g, b] = stop.clamped();
        strip.set_pixel(i, r, g, b)?;
    }
    strip.flush()
}

// WS2812 over SPI at 8 MHz: one data bit stretches to one SPI byte.
// A '1' holds the line high for 6 of 8 slots, a '0' for 2 of 8.
const SPI_BIT_ONE: u8 = 0b1111_1100;
const SPI_BIT_ZERO: u8 = 0b1100_0000;

// Trailing low time latches the frame; the datasheet wants >= 80 us and a
// byte is 1 us at 8 MHz.
const LATCH_BYTES: usize = 120;

/// WS2812 strip driven through a spidev character device.
///
/// Each pixel occupies 24 SPI-expanded bytes in the staging buffer, in the
/// wire's GRB channel order.
pub struct SpiStrip {
    device: File,
    count: usize,
    buffer: Vec<u8>,
}

impl SpiStrip {
    /// Open the SPI device and stage an all-off frame.
    pub fn open(path: impl AsRef<Path>, count: usize) -> Result<Self> {
        let path = path.as_ref();
        let device = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| SkystripError::Led {
                message: format!("Failed to open SPI device {}: {}", path.display(), e),
            })?;

        debug!(device = %path.display(), leds = count, "Opened SPI LED strip");

        let mut strip = Self {
            device,
            count,
            buffer: Vec::new(),
        };
        strip.buffer = vec![SPI_BIT_ZERO; count * 24];
        Ok(strip)
    }

    fn encode_pixel(buffer: &mut [u8], r: u8, g: u8, b: u8) {
        let grb = ((g as u32) << 16) | ((r as u32) << 8) | b as u32;
        for (i, slot) in buffer.iter_mut().enumerate() {
            let bit = (grb >> (23 - i)) & 1;
            *slot = if bit != 0 { SPI_BIT_ONE } else { SPI_BIT_ZERO };
        }
    }
}

impl LedStrip for SpiStrip {
    fn len(&self) -> usize {
        self.count
    }

    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<()> {
        if index >= self.count {
            return Err(SkystripError::Led {
                message: format!("Pixel index {} out of range (strip has {})", index, self.count),
            });
        }
        Self::encode_pixel(&mut self.buffer[index * 24..(index + 1) * 24], r, g, b);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.device.write_all(&self.buffer)?;
        self.device.write_all(&[0u8; LATCH_BYTES])?;
        self.device.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.buffer.fill(SPI_BIT_ZERO);
        self.flush()
    }
}

impl Drop for SpiStrip {
    fn drop(&mut self) {
        // Leave the hardware dark even on error paths
        let _ = self.clear();
    }
}

/// In-memory strip for tests: records staged pixels and flushes.
#[derive(Debug, Default)]
pub struct MemoryStrip {
    pixels: Vec<[u8; 3]>,
    flushes: usize,
    cleared: bool,
}

impl MemoryStrip {
    pub fn new(count: usize) -> Self {
        Self {
            pixels: vec![[0, 0, 0]; count],
            flushes: 0,
            cleared: false,
        }
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn was_cleared(&self) -> bool {
        self.cleared
    }
}

impl LedStrip for MemoryStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<()> {
        if index >= self.pixels.len() {
            return Err(SkystripError::Led {
                message: format!("Pixel index {} out of range", index),
            });
        }
        self.pixels[index] = [r, g, b];
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.pixels.fill([0, 0, 0]);
        self.cleared = true;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_clamps_out_of_range_stops() {
        let mut strip = MemoryStrip::new(3);
        let frame = [
            ColorStop::new(-20, 0, 0),
            ColorStop::new(100, 300, 50),
            ColorStop::new(0, 0, 255),
        ];

        send(&mut strip, &frame).unwrap();
        assert_eq!(strip.pixels(), &[[0, 0, 0], [100, 255, 50], [0, 0, 255]]);
        assert_eq!(strip.flushes(), 1);
    }

    #[test]
    fn test_send_ignores_excess_frame_entries() {
        let mut strip = MemoryStrip::new(2);
        let frame = [
            ColorStop::new(1, 1, 1),
            ColorStop::new(2, 2, 2),
            ColorStop::new(3, 3, 3),
        ];

        send(&mut strip, &frame).unwrap();
        assert_eq!(strip.pixels(), &[[1, 1, 1], [2, 2, 2]]);
    }

    #[test]
    fn test_send_leaves_tail_unset() {
        let mut strip = MemoryStrip::new(4);
        send(&mut strip, &[ColorStop::new(9, 9, 9)]).unwrap();
        assert_eq!(strip.pixels(), &[[9, 9, 9], [0, 0, 0], [0, 0, 0], [0, 0, 0]]);
    }

    #[test]
    fn test_clear_resets_pixels() {
        let mut strip = MemoryStrip::new(2);
        send(&mut strip, &[ColorStop::new(5, 5, 5), ColorStop::new(6, 6, 6)]).unwrap();
        strip.clear().unwrap();
        assert!(strip.was_cleared());
        assert_eq!(strip.pixels(), &[[0, 0, 0], [0, 0, 0]]);
    }

    #[test]
    fn test_spi_pixel_encoding() {
        let mut buffer = [0u8; 24];
        // r=0x80, g=0x00, b=0x01 -> GRB = 0x008001
        SpiStrip::encode_pixel(&mut buffer, 0x80, 0x00, 0x01);

        assert!(buffer[..8].iter().all(|&byte| byte == SPI_BIT_ZERO));
        assert_eq!(buffer[8], SPI_BIT_ONE);
        assert!(buffer[9..23].iter().all(|&byte| byte == SPI_BIT_ZERO));
        assert_eq!(buffer[23], SPI_BIT_ONE);
    }
}
