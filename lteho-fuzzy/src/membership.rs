//! Membership functions
//!
//! Shapes used to describe linguistic terms. The shouldered Gaussians
//! saturate at their height on one side of the mean, which is how the
//! outermost terms of a variable ("POOR", "EXCELLENT") are usually drawn.

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;

/// Membership function shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MembershipFunction {
    /// Gaussian bell centred on `mean`
    Gaussian {
        mean: f64,
        sigma: f64,
        #[serde(default = "default_height")]
        height: f64,
    },
    /// Gaussian that stays at `height` for every x below `mean`
    LowShoulder {
        mean: f64,
        sigma: f64,
        #[serde(default = "default_height")]
        height: f64,
    },
    /// Gaussian that stays at `height` for every x above `mean`
    HighShoulder {
        mean: f64,
        sigma: f64,
        #[serde(default = "default_height")]
        height: f64,
    },
    /// Triangle (left foot, peak, right foot)
    Triangular { left: f64, peak: f64, right: f64 },
    /// Trapezoid (left foot, left shoulder, right shoulder, right foot)
    Trapezoidal {
        left: f64,
        left_top: f64,
        right_top: f64,
        right: f64,
    },
}

fn default_height() -> f64 {
    1.0
}

fn gaussian(x: f64, mean: f64, sigma: f64, height: f64) -> f64 {
    height * (-((x - mean).powi(2)) / (2.0 * sigma * sigma)).exp()
}

impl MembershipFunction {
    /// Unit-height Gaussian
    pub fn gaussian(mean: f64, sigma: f64) -> Self {
        MembershipFunction::Gaussian {
            mean,
            sigma,
            height: 1.0,
        }
    }

    /// Unit-height Gaussian saturated below `mean`
    pub fn low_shoulder(mean: f64, sigma: f64) -> Self {
        MembershipFunction::LowShoulder {
            mean,
            sigma,
            height: 1.0,
        }
    }

    /// Unit-height Gaussian saturated above `mean`
    pub fn high_shoulder(mean: f64, sigma: f64) -> Self {
        MembershipFunction::HighShoulder {
            mean,
            sigma,
            height: 1.0,
        }
    }

    /// Membership degree of `x`, in [0, 1]
    pub fn degree(&self, x: f64) -> f64 {
        let mu = match *self {
            MembershipFunction::Gaussian {
                mean,
                sigma,
                height,
            } => gaussian(x, mean, sigma, height),
            MembershipFunction::LowShoulder {
                mean,
                sigma,
                height,
            } => {
                if x < mean {
                    height
                } else {
                    gaussian(x, mean, sigma, height)
                }
            }
            MembershipFunction::HighShoulder {
                mean,
                sigma,
                height,
            } => {
                if x > mean {
                    height
                } else {
                    gaussian(x, mean, sigma, height)
                }
            }
            MembershipFunction::Triangular { left, peak, right } => {
                if x <= left || x >= right {
                    if x == peak {
                        1.0
                    } else {
                        0.0
                    }
                } else if x <= peak {
                    (x - left) / (peak - left)
                } else {
                    (right - x) / (right - peak)
                }
            }
            MembershipFunction::Trapezoidal {
                left,
                left_top,
                right_top,
                right,
            } => {
                if x >= left_top && x <= right_top {
                    1.0
                } else if x <= left || x >= right {
                    0.0
                } else if x < left_top {
                    (x - left) / (left_top - left)
                } else {
                    (right - x) / (right - right_top)
                }
            }
        };
        mu.clamp(0.0, 1.0)
    }

    /// Checks parameter sanity; `term` names the owner in the error.
    pub fn validate(&self, term: &str) -> Result<(), FuzzyError> {
        let invalid = |reason: &str| FuzzyError::InvalidMembership {
            term: term.to_string(),
            reason: reason.to_string(),
        };

        match *self {
            MembershipFunction::Gaussian {
                mean,
                sigma,
                height,
            }
            | MembershipFunction::LowShoulder {
                mean,
                sigma,
                height,
            }
            | MembershipFunction::HighShoulder {
                mean,
                sigma,
                height,
            } => {
                if !mean.is_finite() {
                    return Err(invalid("mean must be finite"));
                }
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(invalid("sigma must be positive"));
                }
                if !(height > 0.0 && height <= 1.0) {
                    return Err(invalid("height must be in (0, 1]"));
                }
            }
            MembershipFunction::Triangular { left, peak, right } => {
                if ![left, peak, right].iter().all(|v| v.is_finite()) {
                    return Err(invalid("vertices must be finite"));
                }
                if !(left <= peak && peak <= right && left < right) {
                    return Err(invalid("expected left <= peak <= right"));
                }
            }
            MembershipFunction::Trapezoidal {
                left,
                left_top,
                right_top,
                right,
            } => {
                if ![left, left_top, right_top, right].iter().all(|v| v.is_finite()) {
                    return Err(invalid("vertices must be finite"));
                }
                if !(left <= left_top && left_top <= right_top && right_top <= right) {
                    return Err(invalid("expected left <= left_top <= right_top <= right"));
                }
            }
        }
        Ok(())
    }
}

/// Interval Type-2 membership: a lower and an upper Type-1 function
/// bounding the footprint of uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalMembership {
    pub lower: MembershipFunction,
    pub upper: MembershipFunction,
}

impl IntervalMembership {
    pub fn new(lower: MembershipFunction, upper: MembershipFunction) -> Self {
        Self { lower, upper }
    }

    /// Gaussian with uncertain standard deviation.
    ///
    /// The upper bound uses `sigma + spread / 2`, the lower bound
    /// `sigma - spread / 2`; both share `mean` and `height`.
    pub fn gaussian_uncertain_sigma(mean: f64, sigma: f64, spread: f64, height: f64) -> Self {
        let (narrow, wide) = (sigma - spread / 2.0, sigma + spread / 2.0);
        Self {
            lower: MembershipFunction::Gaussian {
                mean,
                sigma: narrow,
                height,
            },
            upper: MembershipFunction::Gaussian {
                mean,
                sigma: wide,
                height,
            },
        }
    }

    /// [`IntervalMembership::gaussian_uncertain_sigma`] saturated below the mean
    pub fn low_shoulder_uncertain_sigma(mean: f64, sigma: f64, spread: f64, height: f64) -> Self {
        let (narrow, wide) = (sigma - spread / 2.0, sigma + spread / 2.0);
        Self {
            lower: MembershipFunction::LowShoulder {
                mean,
                sigma: narrow,
                height,
            },
            upper: MembershipFunction::LowShoulder {
                mean,
                sigma: wide,
                height,
            },
        }
    }

    /// [`IntervalMembership::gaussian_uncertain_sigma`] saturated above the mean
    pub fn high_shoulder_uncertain_sigma(mean: f64, sigma: f64, spread: f64, height: f64) -> Self {
        let (narrow, wide) = (sigma - spread / 2.0, sigma + spread / 2.0);
        Self {
            lower: MembershipFunction::HighShoulder {
                mean,
                sigma: narrow,
                height,
            },
            upper: MembershipFunction::HighShoulder {
                mean,
                sigma: wide,
                height,
            },
        }
    }

    /// (lower, upper) degree of `x`
    pub fn degree(&self, x: f64) -> (f64, f64) {
        (self.lower.degree(x), self.upper.degree(x))
    }

    /// Validates both bounds and checks `lower <= upper` at every sample point.
    pub fn validate(&self, term: &str, samples: impl Iterator<Item = f64>) -> Result<(), FuzzyError> {
        self.lower.validate(term)?;
        self.upper.validate(term)?;
        for x in samples {
            let (lo, hi) = self.degree(x);
            if lo > hi + 1e-9 {
                return Err(FuzzyError::InvertedFootprint {
                    term: term.to_string(),
                    x,
                });
            }
        }
        Ok(())
    }
}
