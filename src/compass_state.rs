/**
 * Everything the compass screen shows, gathered in one place. Only `apply`
 * changes it; rendering reads it.
 */
use crate::heading_filter::{ExponentialHeadingFilter, HeadingFilter};
use crate::telemetry::{true_heading, Celsius, Degrees, HectoPascal};
use crate::telemetry_message::{SensorAccuracy, TelemetryMessage};

/// Pressure changes smaller than this count as steady.
pub const PRESSURE_TREND_THRESHOLD_HPA: HectoPascal = 0.1;


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PressureTrend {
    Rising,
    Falling,
    Steady,
}


impl PressureTrend {
    pub fn between(previous: HectoPascal, current: HectoPascal) -> PressureTrend {
        let change = current - previous;
        if change > PRESSURE_TREND_THRESHOLD_HPA {
            PressureTrend::Rising
        } else if change < -PRESSURE_TREND_THRESHOLD_HPA {
            PressureTrend::Falling
        } else {
            PressureTrend::Steady
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            PressureTrend::Rising => "↑",
            PressureTrend::Falling => "↓",
            PressureTrend::Steady => "→",
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}


pub struct CompassState {
    heading_filter: Box<dyn HeadingFilter>,
    pub declination: Degrees,
    pub pitch: Degrees,
    pub roll: Degrees,
    pub accuracy: SensorAccuracy,
    pub location: Option<Location>,
    pub pressure: Option<HectoPascal>,
    pub previous_pressure: Option<HectoPascal>,
    pub temperature: Option<Celsius>,
    messages_applied: u64,
}


impl CompassState {
    pub fn new(heading_filter: Box<dyn HeadingFilter>) -> CompassState {
        CompassState {
            heading_filter,
            declination: 0.0,
            pitch: 0.0,
            roll: 0.0,
            accuracy: SensorAccuracy::Unreliable,
            location: None,
            pressure: None,
            previous_pressure: None,
            temperature: None,
            messages_applied: 0,
        }
    }

    /**
     * Folds one telemetry sample into the state.
     */
    pub fn apply(&mut self, message: &TelemetryMessage) {
        match *message {
            TelemetryMessage::Compass { azimuth } => {
                self.heading_filter.update(azimuth);
            }
            TelemetryMessage::Accuracy(accuracy) => {
                if accuracy != self.accuracy {
                    info!("Compass accuracy changed to {}", accuracy);
                }
                self.accuracy = accuracy;
            }
            TelemetryMessage::Declination(declination) => self.declination = declination,
            TelemetryMessage::Location { latitude, longitude } => {
                self.location = Some(Location { latitude, longitude });
            }
            TelemetryMessage::Pressure(pressure) => {
                self.previous_pressure = self.pressure;
                self.pressure = Some(pressure);
            }
            TelemetryMessage::Temperature(temperature) => self.temperature = Some(temperature),
            TelemetryMessage::Orientation { pitch, roll } => {
                self.pitch = pitch;
                self.roll = roll;
            }
        }
        self.messages_applied += 1;
    }

    /// Smoothed magnetic azimuth, once a compass sample has arrived.
    pub fn azimuth(&self) -> Option<Degrees> {
        self.heading_filter.heading()
    }

    pub fn true_heading(&self) -> Option<Degrees> {
        self.azimuth().map(|azimuth| true_heading(azimuth, self.declination))
    }

    pub fn pressure_trend(&self) -> Option<PressureTrend> {
        match (self.previous_pressure, self.pressure) {
            (Some(previous), Some(current)) => Some(PressureTrend::between(previous, current)),
            _ => None,
        }
    }

    pub fn messages_applied(&self) -> u64 {
        self.messages_applied
    }
}


impl Default for CompassState {
    fn default() -> CompassState {
        CompassState::new(Box::new(ExponentialHeadingFilter::default()))
    }
}


#[cfg(test)]
mod tests {
    use super::{CompassState, Location, PressureTrend};
    use crate::heading_filter::FixedStepHeadingFilter;
    use crate::telemetry_message::{SensorAccuracy, TelemetryMessage};

    fn assert_approx_eq(value_1: f32, value_2: f32) {
        let tolerance: f32 = 0.0001;
        let diff = (value_1 - value_2).abs();
        assert!(diff < tolerance, "{} vs {}: {} < {} failed", value_1, value_2, diff, tolerance);
    }

    #[test]
    fn test_pressure_trend() {
        assert_eq!(PressureTrend::between(1000.0, 1000.5), PressureTrend::Rising);
        assert_eq!(PressureTrend::between(1000.0, 999.5), PressureTrend::Falling);
        assert_eq!(PressureTrend::between(1000.0, 1000.05), PressureTrend::Steady);
        assert_eq!(PressureTrend::Rising.arrow(), "↑");
    }

    #[test]
    fn test_apply_compass_goes_through_filter() {
        let mut state = CompassState::default();
        assert!(state.azimuth().is_none());
        state.apply(&TelemetryMessage::Compass { azimuth: 200.0 });
        assert_approx_eq(state.azimuth().unwrap(), 200.0);
        state.apply(&TelemetryMessage::Compass { azimuth: 210.0 });
        assert_approx_eq(state.azimuth().unwrap(), 200.3);
    }

    #[test]
    fn test_true_heading() {
        let mut state = CompassState::new(Box::new(FixedStepHeadingFilter::default()));
        state.apply(&TelemetryMessage::Declination(4.0));
        assert!(state.true_heading().is_none());
        state.apply(&TelemetryMessage::Compass { azimuth: 358.0 });
        assert_approx_eq(state.true_heading().unwrap(), 2.0);
    }

    #[test]
    fn test_apply_other_messages() {
        let mut state = CompassState::default();
        state.apply(&TelemetryMessage::Accuracy(SensorAccuracy::Medium));
        state.apply(&TelemetryMessage::Location { latitude: 48.3, longitude: 14.2 });
        state.apply(&TelemetryMessage::Temperature(15.3));
        state.apply(&TelemetryMessage::Orientation { pitch: -1.5, roll: 2.5 });
        assert_eq!(state.accuracy, SensorAccuracy::Medium);
        assert_eq!(state.location, Some(Location { latitude: 48.3, longitude: 14.2 }));
        assert_eq!(state.temperature, Some(15.3));
        assert_eq!((state.pitch, state.roll), (-1.5, 2.5));
        assert_eq!(state.messages_applied(), 4);
    }

    #[test]
    fn test_apply_pressure_keeps_previous() {
        let mut state = CompassState::default();
        state.apply(&TelemetryMessage::Pressure(1013.0));
        assert!(state.pressure_trend().is_none());
        state.apply(&TelemetryMessage::Pressure(1012.0));
        assert_eq!(state.previous_pressure, Some(1013.0));
        assert_eq!(state.pressure_trend(), Some(PressureTrend::Falling));
    }
}
