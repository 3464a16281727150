use thiserror::Error;

/// Input rejected before a layout pass starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("canvas size must be finite and non-negative, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("tag '{label}' has invalid size {width}x{height}")]
    InvalidTagSize {
        label: String,
        width: f32,
        height: f32,
    },
    #[error("tag '{0}' appears more than once")]
    DuplicateLabel(String),
    #[error("invalid spiral parameters a={a}, b={b}, step={step}: need a >= 0, b > 0, step > 0")]
    InvalidSpiral { a: f32, b: f32, step: f32 },
    #[error("invalid scale range [{min}, {max}]: need 0 < min <= max")]
    InvalidScaleRange { min: f32, max: f32 },
}
