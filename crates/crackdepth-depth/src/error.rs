/// An error type for the depth estimation module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DepthError {
    /// No row of the region has a hue inside the crack band.
    #[error("No measurable feature: no row falls inside the crack hue band")]
    NoMeasurableFeature,

    /// More than one all-zero hue row was found, so the dividing line is ambiguous.
    #[error("Ambiguous dividing line: rows {0:?} are all zero hue")]
    AmbiguousDividingLine(Vec<usize>),

    /// The configuration values are not usable.
    #[error("Invalid depth configuration: {0}")]
    InvalidConfig(String),

    /// Error from the underlying image operations.
    #[error(transparent)]
    ImageError(#[from] crackdepth_image::ImageError),
}
