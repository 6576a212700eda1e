/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid for the operation.
    #[error("Invalid image size ({0}, {1}) expected ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a value cannot be cast to the target type.
    #[error("Failed to cast value")]
    CastError,

    /// Error when the number of histogram bins is not valid.
    #[error("Invalid number of histogram bins ({0})")]
    InvalidHistogramBins(usize),

    /// Error when a parameter is not valid for the operation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),
}
