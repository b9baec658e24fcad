use serde::{Deserialize, Serialize};

/// One end of a `lut` shorthand. Evaluating percentiles and medians needs
/// the channel histogram, which lives in the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LutBound {
    /// Raw intensity.
    Absolute(f64),
    /// `p{n}`: n-th percentile of the histogram.
    Percentile(f64),
    /// `m{n}`: median scaled by `n / 100`.
    Median(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LutSetting {
    /// ImageJ-style automatic range.
    AutoIJ,
    Range { min: LutBound, max: LutBound },
}
