/// An error type for the network module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NetworkError {
    /// Error when the matrix data length does not match its shape.
    #[error("Matrix data length ({0}) does not match the shape ({1} x {2})")]
    InvalidShape(usize, usize, usize),

    /// Error when the input feature dimension does not match the network.
    #[error("Input has {0} features, expected {1}")]
    InputDimMismatch(usize, usize),

    /// Error when the target dimension does not match the network output.
    #[error("Target has {0} columns, expected {1}")]
    TargetDimMismatch(usize, usize),

    /// Error when the input and target batch sizes differ.
    #[error("Input batch has {0} rows but target has {1}")]
    BatchSizeMismatch(usize, usize),
}
