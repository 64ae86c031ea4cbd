/**
 * Recorded sensor samples and the line format they are stored in.
 *
 * One record per line, fields separated by `;`:
 *
 * ```text
 * compass;<azimuth degrees>
 * accuracy;<0-3>
 * declination;<degrees, east positive>
 * location;<latitude>;<latitude ref>;<longitude>;<longitude ref>
 * pressure;<hPa>
 * temperature;<celsius>
 * orientation;<pitch degrees>;<roll degrees>
 * ```
 *
 * Location fields take the same coordinate strings as Exif metadata, so
 * `location;48°19'51.5";N;14°16'20,4";E` works.
 */
use std::fmt;

use crate::coordinate::parse_coordinate;
use crate::telemetry::{Celsius, Degrees, HectoPascal};


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SensorAccuracy {
    Unreliable,
    Low,
    Medium,
    High,
}


impl SensorAccuracy {
    pub fn from_level(level: u8) -> Option<SensorAccuracy> {
        match level {
            0 => Some(SensorAccuracy::Unreliable),
            1 => Some(SensorAccuracy::Low),
            2 => Some(SensorAccuracy::Medium),
            3 => Some(SensorAccuracy::High),
            _ => None,
        }
    }
}


impl fmt::Display for SensorAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            SensorAccuracy::Unreliable => "unreliable",
            SensorAccuracy::Low => "low",
            SensorAccuracy::Medium => "medium",
            SensorAccuracy::High => "high",
        };
        write!(f, "{}", name)
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TelemetryMessage {
    Compass { azimuth: Degrees },
    Accuracy(SensorAccuracy),
    Declination(Degrees),
    Location { latitude: f64, longitude: f64 },
    Pressure(HectoPascal),
    Temperature(Celsius),
    Orientation { pitch: Degrees, roll: Degrees },
}


macro_rules! bail_none {
    ($option:expr) => {
        match $option {
            Some(s) => s,
            None => return Err("Message too short".to_string()),
        }
    };
}
macro_rules! bail_err {
    ($result:expr) => {
        match $result {
            Ok(s) => s,
            Err(e) => return Err(e.to_string()),
        }
    };
}


fn parse_finite(field: &str) -> Result<f32, String> {
    let value: f32 = bail_err!(field.trim().parse());
    if !value.is_finite() {
        return Err(format!("Value is not finite: {}", field));
    }
    Ok(value)
}


impl TelemetryMessage {
    /**
     * Parses one record. Blank lines and comments are not records; callers
     * should skip them before calling this.
     */
    pub fn parse(line: &str) -> Result<TelemetryMessage, String> {
        let mut iterator = line.trim().split(';');
        let kind = bail_none!(iterator.next()).trim();

        let message = match kind {
            "compass" => TelemetryMessage::Compass {
                azimuth: parse_finite(bail_none!(iterator.next()))?,
            },
            "accuracy" => {
                let level: u8 = bail_err!(bail_none!(iterator.next()).trim().parse());
                match SensorAccuracy::from_level(level) {
                    Some(accuracy) => TelemetryMessage::Accuracy(accuracy),
                    None => return Err(format!("Unknown accuracy level: {}", level)),
                }
            }
            "declination" => {
                TelemetryMessage::Declination(parse_finite(bail_none!(iterator.next()))?)
            }
            "location" => {
                let latitude_str = bail_none!(iterator.next());
                let latitude_ref = bail_none!(iterator.next());
                let longitude_str = bail_none!(iterator.next());
                let longitude_ref = bail_none!(iterator.next());
                let latitude = match parse_coordinate(Some(latitude_str), Some(latitude_ref)) {
                    Some(latitude) => latitude,
                    None => return Err(format!("Unusable latitude: '{}'", latitude_str)),
                };
                let longitude = match parse_coordinate(Some(longitude_str), Some(longitude_ref)) {
                    Some(longitude) => longitude,
                    None => return Err(format!("Unusable longitude: '{}'", longitude_str)),
                };
                TelemetryMessage::Location { latitude, longitude }
            }
            "pressure" => {
                let pressure = parse_finite(bail_none!(iterator.next()))?;
                if pressure <= 0.0 {
                    return Err(format!("Pressure must be positive: {}", pressure));
                }
                TelemetryMessage::Pressure(pressure)
            }
            "temperature" => {
                TelemetryMessage::Temperature(parse_finite(bail_none!(iterator.next()))?)
            }
            "orientation" => {
                let pitch = parse_finite(bail_none!(iterator.next()))?;
                let roll = parse_finite(bail_none!(iterator.next()))?;
                TelemetryMessage::Orientation { pitch, roll }
            }
            _ => return Err(format!("Unknown message type: '{}'", kind)),
        };

        if iterator.next().is_some() {
            return Err("Trailing fields".to_string());
        }
        Ok(message)
    }
}
