/**
 * Parses GPS coordinate strings as they show up in Exif and XMP metadata and
 * formats decimal coordinates for display.
 *
 * Metadata writers don't agree on a format. We see things like
 * `59° 19' 21.87"`, `4, 15, 30,5` (comma as the decimal separator),
 * `45,5` and the XMP form `48,19.8583N`, so parsing is a best effort cleanup
 * rather than a grammar.
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Characters used as degree, minute and second markers.
const COMPONENT_MARKERS: [char; 6] = ['°', 'º', '\'', '′', '"', '″'];


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateFormat {
    Decimal,
    Dms,
}


impl Default for CoordinateFormat {
    fn default() -> CoordinateFormat {
        CoordinateFormat::Decimal
    }
}


impl FromStr for CoordinateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<CoordinateFormat, String> {
        match s.to_ascii_lowercase().as_str() {
            "decimal" => Ok(CoordinateFormat::Decimal),
            "dms" => Ok(CoordinateFormat::Dms),
            _ => Err(format!("Unknown coordinate format: {}", s)),
        }
    }
}


impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CoordinateFormat::Decimal => write!(f, "decimal"),
            CoordinateFormat::Dms => write!(f, "dms"),
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Axis {
    Latitude,
    Longitude,
}


/**
 * Converts a coordinate string and hemisphere reference into signed decimal
 * degrees. South and west references negate the value.
 *
 * Returns None when the coordinate is absent, empty or has no numeric
 * component; callers should treat that as "coordinate unavailable". Missing
 * minutes and seconds count as zero, as do components that don't parse.
 */
pub fn parse_coordinate(coordinate: Option<&str>, reference: Option<&str>) -> Option<f64> {
    let trimmed = coordinate?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (body, embedded_reference) = split_hemisphere(trimmed);
    let reference = match reference.map(str::trim) {
        Some(r) if !r.is_empty() => Some(r),
        _ => embedded_reference,
    };

    let separated: String = body
        .chars()
        .map(|c| if COMPONENT_MARKERS.contains(&c) { ' ' } else { c })
        .collect();
    let normalized = normalize_decimal_comma(separated.trim());

    let mut components = [0.0f64; 3];
    let mut numeric_count = 0;
    let tokens = normalized
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .take(components.len());
    for (index, token) in tokens.enumerate() {
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                components[index] = value;
                numeric_count += 1;
            }
            _ => debug!("Ignoring non-numeric coordinate component '{}'", token),
        }
    }
    if numeric_count == 0 {
        debug!("No numeric components in coordinate '{}'", trimmed);
        return None;
    }

    let [degrees, minutes, seconds] = components;
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    if is_negative_reference(reference) {
        Some(-decimal)
    } else {
        Some(decimal)
    }
}


/**
 * Formats a decimal coordinate either as six decimal places or as
 * degrees/minutes/seconds with a hemisphere letter.
 */
pub fn format_coordinate(value: f64, format: CoordinateFormat, axis: Axis) -> String {
    match format {
        CoordinateFormat::Decimal => format!("{:.6}", value),
        CoordinateFormat::Dms => {
            // Work in tenths of a second so rounding carries into minutes
            let tenths = (value.abs() * 36000.0).round() as u64;
            // Anything that rounds to zero is on the equator or meridian
            let hemisphere = match (axis, value < 0.0 && tenths > 0) {
                (Axis::Latitude, false) => 'N',
                (Axis::Latitude, true) => 'S',
                (Axis::Longitude, false) => 'E',
                (Axis::Longitude, true) => 'W',
            };
            let degrees = tenths / 36000;
            let minutes = (tenths % 36000) / 600;
            let seconds_tenths = tenths % 600;
            format!(
                "{}° {}' {}.{}\" {}",
                degrees,
                minutes,
                seconds_tenths / 10,
                seconds_tenths % 10,
                hemisphere)
        }
    }
}


fn is_negative_reference(reference: Option<&str>) -> bool {
    match reference {
        Some(r) => r.eq_ignore_ascii_case("S") || r.eq_ignore_ascii_case("W"),
        None => false,
    }
}


fn is_hemisphere_letter(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'N' | 'S' | 'E' | 'W')
}


/**
 * Splits a leading or trailing hemisphere letter off a coordinate, as in
 * `48,19.8583N` or `N 48° 19'`.
 */
fn split_hemisphere(coordinate: &str) -> (&str, Option<&str>) {
    if let Some(last) = coordinate.chars().last() {
        if is_hemisphere_letter(last) {
            let split = coordinate.len() - last.len_utf8();
            return (&coordinate[..split], Some(&coordinate[split..]));
        }
    }
    if let Some(first) = coordinate.chars().next() {
        if is_hemisphere_letter(first) {
            let split = first.len_utf8();
            return (&coordinate[split..], Some(&coordinate[..split]));
        }
    }
    (coordinate, None)
}


/**
 * Turns the last comma into a decimal point, unless the string already has a
 * decimal point or the comma is followed by whitespace, in which case every
 * comma is a component separator.
 */
fn normalize_decimal_comma(coordinate: &str) -> String {
    if coordinate.contains('.') {
        return coordinate.to_string();
    }
    match coordinate.rfind(',') {
        Some(position) => {
            let followed_by_space = coordinate[position + 1..]
                .chars()
                .next()
                .map_or(false, char::is_whitespace);
            if followed_by_space {
                return coordinate.to_string();
            }
            let mut normalized = String::with_capacity(coordinate.len());
            normalized.push_str(&coordinate[..position]);
            normalized.push('.');
            normalized.push_str(&coordinate[position + 1..]);
            normalized
        }
        None => coordinate.to_string(),
    }
}
