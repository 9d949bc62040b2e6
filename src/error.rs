use std::fmt;

/// Top-level error for the multiplex/demultiplex pipeline.
///
/// Every variant is a caller precondition violation detected before any
/// numeric work begins; none is transient or retryable. Degenerate numeric
/// inputs (an all-zero signal) are not errors — they pass through the
/// zero-guarded normalization unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum FdmError {
    Filter(FilterSpecError),
    /// Demultiplex was requested for a label with no matching descriptor.
    ChannelNotFound { label: String },
    /// Paired signals disagree on sample rate.
    SampleRateMismatch { expected_hz: f64, found_hz: f64 },
    /// A zero-length signal reached a pipeline stage.
    EmptySignal { stage: &'static str },
    /// Modulator inputs do not share the conditioner's fixed length.
    LengthMismatch { expected: usize, found: usize },
    /// The number of raw inputs does not match the number of configured
    /// channels.
    ChannelCountMismatch { expected: usize, found: usize },
    /// Two channels' occupied bands overlap.
    CarrierOverlap {
        first: String,
        second: String,
        separation_hz: f64,
        required_hz: f64,
    },
}

/// Invalid Butterworth filter parameterization.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpecError {
    /// Filter order must be at least 1.
    OrderTooLow { order: usize },
    /// A cutoff frequency was zero or negative.
    NonPositiveCutoff { cutoff_hz: f64 },
    /// A cutoff reached or exceeded the Nyquist frequency.
    /// (A band-pass *upper* cutoff is clamped instead, not rejected.)
    CutoffAboveNyquist { cutoff_hz: f64, nyquist_hz: f64 },
    /// Band-pass edges are inverted or equal, after clamping.
    InvertedBand { low_hz: f64, high_hz: f64 },
    /// Sample rate must be positive.
    NonPositiveSampleRate { sample_rate_hz: f64 },
}

impl fmt::Display for FdmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FdmError::Filter(e) => write!(f, "Invalid filter spec: {e}"),
            FdmError::ChannelNotFound { label } => {
                write!(f, "No channel descriptor for label '{label}'")
            }
            FdmError::SampleRateMismatch { expected_hz, found_hz } => {
                write!(f, "Sample rate mismatch: expected {expected_hz} Hz, found {found_hz} Hz")
            }
            FdmError::EmptySignal { stage } => {
                write!(f, "Empty signal at stage '{stage}'")
            }
            FdmError::LengthMismatch { expected, found } => {
                write!(f, "Length mismatch: expected {expected} samples, found {found}")
            }
            FdmError::ChannelCountMismatch { expected, found } => {
                write!(f, "Expected one input per channel ({expected}), found {found}")
            }
            FdmError::CarrierOverlap { first, second, separation_hz, required_hz } => {
                write!(
                    f,
                    "Channels '{first}' and '{second}' overlap: carriers {separation_hz} Hz apart, need more than {required_hz} Hz"
                )
            }
        }
    }
}

impl std::error::Error for FdmError {}

impl fmt::Display for FilterSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpecError::OrderTooLow { order } => {
                write!(f, "order {order} is below the minimum of 1")
            }
            FilterSpecError::NonPositiveCutoff { cutoff_hz } => {
                write!(f, "cutoff {cutoff_hz} Hz is not strictly positive")
            }
            FilterSpecError::CutoffAboveNyquist { cutoff_hz, nyquist_hz } => {
                write!(f, "cutoff {cutoff_hz} Hz reaches Nyquist ({nyquist_hz} Hz)")
            }
            FilterSpecError::InvertedBand { low_hz, high_hz } => {
                write!(f, "band edges inverted: low {low_hz} Hz >= high {high_hz} Hz")
            }
            FilterSpecError::NonPositiveSampleRate { sample_rate_hz } => {
                write!(f, "sample rate {sample_rate_hz} Hz is not strictly positive")
            }
        }
    }
}

impl std::error::Error for FilterSpecError {}

impl From<FilterSpecError> for FdmError {
    fn from(e: FilterSpecError) -> Self {
        FdmError::Filter(e)
    }
}
