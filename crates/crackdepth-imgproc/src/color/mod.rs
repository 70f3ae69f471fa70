mod hue;

pub use hue::{hue_from_rgb, hue_from_rgb_pixel, ChannelOrder};
