use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowfitError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Duplicate node: x[{index}] = {value} repeats an earlier node")]
    DuplicateNode { index: usize, value: f64 },

    #[error("Nodes not increasing: x[{index}] is smaller than the node before it")]
    NotIncreasing { index: usize },

    #[error("Insufficient data for {context}: need at least {required} points, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize,
        context: &'static str,
    },

    #[error("Non-finite value in {context} at index {index}")]
    NonFinite { index: usize, context: &'static str },

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlowfitError>;
