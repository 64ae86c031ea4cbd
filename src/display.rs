/**
 * Renders the compass state as text lines.
 */
use chrono::NaiveDateTime;

use crate::compass_state::CompassState;
use crate::coordinate::{format_coordinate, Axis};
use crate::settings::Settings;
use crate::telemetry::{
    barometric_altitude_m, cardinal_direction, Language, STANDARD_SEA_LEVEL_HPA,
};

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M:%S";


/**
 * Produces the lines of one frame. Pure: the same state, settings, language
 * and time always give the same lines. Resolve a "system" language before
 * calling.
 */
pub fn render(
    state: &CompassState,
    settings: &Settings,
    language: Language,
    now: NaiveDateTime,
) -> Vec<String> {
    let mut lines = Vec::new();

    match state.true_heading() {
        Some(heading) => {
            // Truncate like the dial does, so 359.9 never shows as 360
            let degrees = heading as u32 % 360;
            lines.push(format!(
                "{}° {}",
                degrees,
                cardinal_direction(degrees as f32, language)));
        }
        None => lines.push("---° --".to_string()),
    }
    lines.push(format!("Accuracy: {}", state.accuracy));
    lines.push(format!("Pitch: {:.1}° Roll: {:.1}°", state.pitch, state.roll));

    let location = match state.location {
        Some(location) => location,
        None => {
            lines.push("Waiting for location...".to_string());
            return lines;
        }
    };

    lines.push(format!(
        "Latitude: {}",
        format_coordinate(location.latitude, settings.coordinate_format, Axis::Latitude)));
    lines.push(format!(
        "Longitude: {}",
        format_coordinate(location.longitude, settings.coordinate_format, Axis::Longitude)));
    if let Some(altitude) = state
        .pressure
        .and_then(|pressure| barometric_altitude_m(pressure, STANDARD_SEA_LEVEL_HPA))
    {
        lines.push(format!("Altitude: {:.1} m", altitude));
    }

    lines.push(format!("Date: {}", now.format(DATE_FORMAT)));
    lines.push(format!("Time: {}", now.format(TIME_FORMAT)));

    if let Some(celsius) = state.temperature {
        let unit = settings.temperature_unit;
        lines.push(format!("Temperature: {:.1} {}", unit.convert(celsius), unit.symbol()));
    }
    if let Some(pressure) = state.pressure {
        match state.pressure_trend() {
            Some(trend) => lines.push(format!("Pressure: {:.2} hPa {}", pressure, trend.arrow())),
            None => lines.push(format!("Pressure: {:.2} hPa", pressure)),
        }
    }
    lines
}


#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::render;
    use crate::compass_state::CompassState;
    use crate::coordinate::CoordinateFormat;
    use crate::settings::{Settings, TemperatureUnit};
    use crate::telemetry::Language;
    use crate::telemetry_message::{SensorAccuracy, TelemetryMessage};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 29)
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .unwrap()
    }


    #[test]
    fn test_render_without_samples() {
        let state = CompassState::default();
        let lines = render(&state, &Settings::default(), Language::English, now());
        assert_eq!(
            lines,
            vec![
                "---° --".to_string(),
                "Accuracy: unreliable".to_string(),
                "Pitch: 0.0° Roll: 0.0°".to_string(),
                "Waiting for location...".to_string(),
            ]);
    }

    #[test]
    fn test_render_full_frame() {
        let mut state = CompassState::default();
        state.apply(&TelemetryMessage::Compass { azimuth: 330.0 });
        state.apply(&TelemetryMessage::Declination(-4.0));
        state.apply(&TelemetryMessage::Accuracy(SensorAccuracy::High));
        state.apply(&TelemetryMessage::Orientation { pitch: -1.5, roll: 2.5 });
        state.apply(&TelemetryMessage::Location { latitude: 48.330967, longitude: 14.272329 });
        state.apply(&TelemetryMessage::Pressure(1013.25));
        state.apply(&TelemetryMessage::Pressure(1014.0));
        state.apply(&TelemetryMessage::Temperature(15.3));

        let lines = render(&state, &Settings::default(), Language::English, now());
        assert_eq!(lines[0], "326° NW");
        assert_eq!(lines[1], "Accuracy: high");
        assert_eq!(lines[2], "Pitch: -1.5° Roll: 2.5°");
        assert_eq!(lines[3], "Latitude: 48.330967");
        assert_eq!(lines[4], "Longitude: 14.272329");
        assert!(lines[5].starts_with("Altitude: -6."), "{}", lines[5]);
        assert_eq!(lines[6], "Date: 29.10.2025");
        assert_eq!(lines[7], "Time: 23:59:59");
        assert_eq!(lines[8], "Temperature: 15.3 °C");
        assert_eq!(lines[9], "Pressure: 1014.00 hPa ↑");
    }

    #[test]
    fn test_render_respects_settings() {
        let mut state = CompassState::default();
        state.apply(&TelemetryMessage::Compass { azimuth: 90.0 });
        state.apply(&TelemetryMessage::Location { latitude: -45.5, longitude: -105.185664 });
        state.apply(&TelemetryMessage::Temperature(100.0));

        let mut settings = Settings::default();
        settings.coordinate_format = CoordinateFormat::Dms;
        settings.temperature_unit = TemperatureUnit::Fahrenheit;

        let lines = render(&state, &settings, Language::German, now());
        assert_eq!(lines[0], "90° O");
        assert_eq!(lines[3], "Latitude: 45° 30' 0.0\" S");
        assert_eq!(lines[4], "Longitude: 105° 11' 8.4\" W");
        assert_eq!(lines[7], "Temperature: 212.0 °F");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_render_uses_given_language() {
        let mut state = CompassState::default();
        state.apply(&TelemetryMessage::Compass { azimuth: 90.0 });
        let settings = Settings::default();
        assert_eq!(settings.language, "system");

        let english = render(&state, &settings, Language::English, now());
        let german = render(&state, &settings, Language::German, now());
        assert_eq!(english[0], "90° E");
        assert_eq!(german[0], "90° O");
        assert_eq!(render(&state, &settings, Language::German, now()), german);
    }
}
