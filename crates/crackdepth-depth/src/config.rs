use crackdepth_imgproc::{color::ChannelOrder, threshold::HueBand};
use serde::{Deserialize, Serialize};

use crate::error::DepthError;

/// Millimetres represented by one pixel row in the reference imaging setup.
pub const DEFAULT_DEPTH_PER_PIXEL: f64 = 12.0 / 110.0;

/// Configuration of the crack depth estimator.
///
/// # Examples
///
/// ```
/// use crackdepth_depth::DepthConfig;
///
/// let config = DepthConfig::default().with_depth_per_pixel(0.5);
/// assert_eq!(config.depth_per_pixel, 0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Physical depth, in millimetres, of one pixel row.
    pub depth_per_pixel: f64,
    /// Hue band considered crack colored.
    pub hue_band: HueBand,
    /// Channel order of the regions handed to the estimator.
    pub channel_order: ChannelOrder,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            depth_per_pixel: DEFAULT_DEPTH_PER_PIXEL,
            hue_band: HueBand::default(),
            channel_order: ChannelOrder::default(),
        }
    }
}

impl DepthConfig {
    /// Sets the depth represented by one pixel row.
    pub fn with_depth_per_pixel(mut self, depth_per_pixel: f64) -> Self {
        self.depth_per_pixel = depth_per_pixel;
        self
    }

    /// Sets the crack hue band.
    pub fn with_hue_band(mut self, hue_band: HueBand) -> Self {
        self.hue_band = hue_band;
        self
    }

    /// Sets the channel order of the input regions.
    pub fn with_channel_order(mut self, channel_order: ChannelOrder) -> Self {
        self.channel_order = channel_order;
        self
    }

    /// Check that the configuration can produce meaningful depths.
    pub fn validate(&self) -> Result<(), DepthError> {
        if !self.depth_per_pixel.is_finite() || self.depth_per_pixel <= 0.0 {
            return Err(DepthError::InvalidConfig(format!(
                "depth_per_pixel must be a positive number, got {}",
                self.depth_per_pixel
            )));
        }

        let band = &self.hue_band;
        if !(band.low.is_finite() && band.high.is_finite() && band.wrap.is_finite()) {
            return Err(DepthError::InvalidConfig(format!(
                "hue band bounds must be finite, got {band:?}"
            )));
        }

        if band.low >= band.high {
            return Err(DepthError::InvalidConfig(format!(
                "hue band low ({}) must be below high ({})",
                band.low, band.high
            )));
        }

        Ok(())
    }
}
