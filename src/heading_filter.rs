/**
 * Smooths raw compass azimuth samples into a stable heading.
 */
use crate::telemetry::{signed_difference_d, wrap_degrees, Degrees};

/// Weight of the previous estimate in the exponential filter.
pub const DEFAULT_RETENTION: f32 = 0.97;
/// Fraction of the remaining difference the step follower moves per sample.
pub const DEFAULT_STEP_FRACTION: f32 = 0.1;
/// Below this difference the step follower lands on the sample.
pub const STEP_SNAP_D: Degrees = 0.01;


/**
 * A filter that owns one heading estimate in [0, 360). Samples must be fed
 * in order from a single loop.
 */
pub trait HeadingFilter: Send {
    /**
     * Folds a raw heading sample into the estimate and returns the new
     * estimate. The first sample is taken as is.
     */
    fn update(&mut self, raw_heading_d: Degrees) -> Degrees;

    /**
     * Returns the current estimate, or None if no sample has been seen.
     */
    fn heading(&self) -> Option<Degrees>;

    /**
     * Forgets the estimate so that the next sample initializes it again.
     */
    fn reset(&mut self);
}


/**
 * Exponential filter that blends along the shorter rotation:
 * estimate += difference * (1 - retention).
 */
pub struct ExponentialHeadingFilter {
    retention: f32,
    estimate_d: Option<Degrees>,
}


impl ExponentialHeadingFilter {
    /**
     * Retention must be in [0, 1). Higher values are smoother but slower.
     */
    pub fn new(retention: f32) -> Result<ExponentialHeadingFilter, String> {
        if !(0.0..1.0).contains(&retention) {
            return Err(format!("Retention must be in [0, 1), got {}", retention));
        }
        Ok(ExponentialHeadingFilter {
            retention,
            estimate_d: None,
        })
    }

    pub fn retention(&self) -> f32 {
        self.retention
    }
}


impl Default for ExponentialHeadingFilter {
    fn default() -> ExponentialHeadingFilter {
        ExponentialHeadingFilter {
            retention: DEFAULT_RETENTION,
            estimate_d: None,
        }
    }
}


impl HeadingFilter for ExponentialHeadingFilter {
    fn update(&mut self, raw_heading_d: Degrees) -> Degrees {
        let raw = wrap_degrees(raw_heading_d);
        let estimate = match self.estimate_d {
            Some(previous) => {
                let difference = signed_difference_d(previous, raw);
                wrap_degrees(previous + difference * (1.0 - self.retention))
            }
            None => {
                debug!("Initializing heading estimate at {}", raw);
                raw
            }
        };
        self.estimate_d = Some(estimate);
        estimate
    }

    fn heading(&self) -> Option<Degrees> {
        self.estimate_d
    }

    fn reset(&mut self) {
        self.estimate_d = None;
    }
}


/**
 * Follower that moves a fixed fraction of the shorter rotation toward each
 * sample, landing on it once the remaining difference is negligible.
 */
pub struct FixedStepHeadingFilter {
    fraction: f32,
    estimate_d: Option<Degrees>,
}


impl FixedStepHeadingFilter {
    /**
     * Fraction must be in (0, 1].
     */
    pub fn new(fraction: f32) -> Result<FixedStepHeadingFilter, String> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(format!("Step fraction must be in (0, 1], got {}", fraction));
        }
        Ok(FixedStepHeadingFilter {
            fraction,
            estimate_d: None,
        })
    }
}


impl Default for FixedStepHeadingFilter {
    fn default() -> FixedStepHeadingFilter {
        FixedStepHeadingFilter {
            fraction: DEFAULT_STEP_FRACTION,
            estimate_d: None,
        }
    }
}


impl HeadingFilter for FixedStepHeadingFilter {
    fn update(&mut self, raw_heading_d: Degrees) -> Degrees {
        let raw = wrap_degrees(raw_heading_d);
        let estimate = match self.estimate_d {
            Some(previous) => {
                let difference = signed_difference_d(previous, raw);
                if difference.abs() < STEP_SNAP_D {
                    raw
                } else {
                    wrap_degrees(previous + difference * self.fraction)
                }
            }
            None => {
                debug!("Initializing heading estimate at {}", raw);
                raw
            }
        };
        self.estimate_d = Some(estimate);
        estimate
    }

    fn heading(&self) -> Option<Degrees> {
        self.estimate_d
    }

    fn reset(&mut self) {
        self.estimate_d = None;
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterKind {
    Exponential,
    FixedStep,
}


impl FilterKind {
    pub fn from_name(name: &str) -> Result<FilterKind, String> {
        match name.to_ascii_lowercase().as_str() {
            "exponential" => Ok(FilterKind::Exponential),
            "step" | "fixed-step" => Ok(FilterKind::FixedStep),
            _ => Err(format!("Unknown heading filter: {}", name)),
        }
    }

    /**
     * Builds a filter of this kind. The parameter is the retention for the
     * exponential filter and the step fraction for the step follower.
     */
    pub fn build(self, parameter: Option<f32>) -> Result<Box<dyn HeadingFilter>, String> {
        Ok(match (self, parameter) {
            (FilterKind::Exponential, Some(retention)) => {
                Box::new(ExponentialHeadingFilter::new(retention)?)
            }
            (FilterKind::Exponential, None) => Box::new(ExponentialHeadingFilter::default()),
            (FilterKind::FixedStep, Some(fraction)) => {
                Box::new(FixedStepHeadingFilter::new(fraction)?)
            }
            (FilterKind::FixedStep, None) => Box::new(FixedStepHeadingFilter::default()),
        })
    }
}
