/// Fixed-size multi-channel pixel grid
use crate::error::{Error, Result};

/// Row-major grid of `width * height` cells with `channels` samples each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    samples: Vec<u32>,
    width: usize,
    height: usize,
    channels: usize,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer, failing if the sample count overflows or
    /// cannot be allocated
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self> {
        let too_large = || Error::BufferTooLarge {
            width,
            height,
            channels,
        };
        let len = width
            .checked_mul(height)
            .and_then(|cells| cells.checked_mul(channels))
            .ok_or_else(too_large)?;

        let mut samples = Vec::new();
        samples.try_reserve_exact(len).map_err(|_| too_large())?;
        samples.resize(len, 0);

        Ok(Self {
            samples,
            width,
            height,
            channels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn samples(&self) -> &[u32] {
        &self.samples
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    pub fn set(&mut self, x: usize, y: usize, values: &[u32]) -> Result<()> {
        if values.len() != self.channels {
            return Err(Error::ChannelMismatch {
                expected: self.channels,
                actual: values.len(),
            });
        }
        let start = self.offset(x, y)?;
        self.samples[start..start + self.channels].copy_from_slice(values);
        Ok(())
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&[u32]> {
        let start = self.offset(x, y)?;
        Ok(&self.samples[start..start + self.channels])
    }

    /// Reset every sample to zero
    pub fn clear(&mut self) {
        self.samples.fill(0);
    }

    /// Coordinates of all cells with at least one non-zero channel
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.samples
            .chunks_exact(self.channels.max(1))
            .enumerate()
            .filter(|(_, cell)| cell.iter().any(|&s| s != 0))
            .map(move |(i, _)| (i % width, i / width))
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) * self.channels)
    }
}
