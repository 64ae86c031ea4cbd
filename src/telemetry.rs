/**
 * Angle and barometer helpers shared by the heading filters and the display.
 */

pub type Degrees = f32;
pub type Meter = f32;
pub type HectoPascal = f32;
pub type Celsius = f32;

/// Standard atmosphere pressure at sea level.
pub const STANDARD_SEA_LEVEL_HPA: HectoPascal = 1013.25;


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Language {
    English,
    German,
}


impl Language {
    /**
     * Picks the language from a tag such as "de" or "de-AT". Anything we
     * don't have names for, including "system", falls back to English.
     */
    pub fn from_tag(tag: &str) -> Language {
        let primary = tag.split(|c| c == '-' || c == '_').next().unwrap_or("");
        if primary.eq_ignore_ascii_case("de") {
            Language::German
        } else {
            Language::English
        }
    }
}


const CARDINALS_EN: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];
const CARDINALS_DE: [&str; 16] = [
    "N", "NNO", "NO", "ONO", "O", "OSO", "SO", "SSO",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];


/**
 * Wraps degrees into the range [0, 360).
 */
pub fn wrap_degrees(degrees: Degrees) -> Degrees {
    let wrapped = degrees % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // -1e-6 + 360.0 rounds to 360.0 in f32
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}


/**
 * Returns the signed rotation from one heading to another along the shorter
 * path, in (-180, 180]. Positive is clockwise.
 */
pub fn signed_difference_d(from: Degrees, to: Degrees) -> Degrees {
    let difference = wrap_degrees(to - from);
    if difference > 180.0 {
        difference - 360.0
    } else {
        difference
    }
}


/**
 * Returns the absolute difference between two headings, in [0, 180].
 */
pub fn difference_d(heading_1: Degrees, heading_2: Degrees) -> Degrees {
    signed_difference_d(heading_1, heading_2).abs()
}


/**
 * Converts a magnetic azimuth to a true heading. Declination is east
 * positive.
 */
pub fn true_heading(magnetic_azimuth: Degrees, declination: Degrees) -> Degrees {
    wrap_degrees(magnetic_azimuth + declination)
}


/**
 * Returns the 16 point compass name for a heading.
 */
pub fn cardinal_direction(degrees: Degrees, language: Language) -> &'static str {
    let index = ((wrap_degrees(degrees) + 11.25) / 22.5) as usize % 16;
    match language {
        Language::English => CARDINALS_EN[index],
        Language::German => CARDINALS_DE[index],
    }
}


/**
 * Altitude from barometric pressure using the international barometric
 * formula. Returns None for non-positive pressures.
 */
pub fn barometric_altitude_m(pressure: HectoPascal, sea_level: HectoPascal) -> Option<Meter> {
    if pressure <= 0.0 || sea_level <= 0.0 {
        return None;
    }
    let coefficient = 1.0f32 / 5.255;
    Some(44330.0 * (1.0 - (pressure / sea_level).powf(coefficient)))
}


#[cfg(test)]
mod tests {
    use super::{
        barometric_altitude_m, cardinal_direction, difference_d, signed_difference_d,
        true_heading, wrap_degrees, Language, STANDARD_SEA_LEVEL_HPA,
    };

    fn assert_approx_eq(value_1: f32, value_2: f32) {
        let tolerance: f32 = 0.0001;
        let diff = (value_1 - value_2).abs();
        assert!(diff < tolerance, "{} vs {}: {} < {} failed", value_1, value_2, diff, tolerance);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_approx_eq(wrap_degrees(0.0), 0.0);
        assert_approx_eq(wrap_degrees(360.0), 0.0);
        assert_approx_eq(wrap_degrees(361.0), 1.0);
        assert_approx_eq(wrap_degrees(-1.0), 359.0);
        assert_approx_eq(wrap_degrees(720.5), 0.5);
        assert_approx_eq(wrap_degrees(-720.5), 359.5);
        let tiny = wrap_degrees(-0.000001);
        assert!(tiny >= 0.0 && tiny < 360.0);
    }

    #[test]
    fn test_signed_difference_d() {
        assert_approx_eq(signed_difference_d(359.0, 1.0), 2.0);
        assert_approx_eq(signed_difference_d(1.0, 359.0), -2.0);
        assert_approx_eq(signed_difference_d(90.0, 270.0), 180.0);
        assert_approx_eq(signed_difference_d(270.0, 90.0), 180.0);
        assert_approx_eq(signed_difference_d(10.0, 50.0), 40.0);
        assert_approx_eq(signed_difference_d(50.0, 10.0), -40.0);
    }

    #[test]
    fn test_difference_d() {
        assert_approx_eq(difference_d(359.0, 1.0), 2.0);
        assert_approx_eq(difference_d(1.0, 359.0), 2.0);
        assert_approx_eq(difference_d(0.0, 180.0), 180.0);
        assert_approx_eq(difference_d(45.0, 45.0), 0.0);
    }

    #[test]
    fn test_true_heading() {
        assert_approx_eq(true_heading(10.0, 4.0), 14.0);
        assert_approx_eq(true_heading(358.0, 4.0), 2.0);
        assert_approx_eq(true_heading(2.0, -4.0), 358.0);
    }

    #[test]
    fn test_cardinal_direction() {
        assert_eq!(cardinal_direction(0.0, Language::English), "N");
        assert_eq!(cardinal_direction(11.0, Language::English), "N");
        assert_eq!(cardinal_direction(11.25, Language::English), "NNE");
        assert_eq!(cardinal_direction(90.0, Language::English), "E");
        assert_eq!(cardinal_direction(90.0, Language::German), "O");
        assert_eq!(cardinal_direction(326.0, Language::German), "NW");
        assert_eq!(cardinal_direction(349.0, Language::English), "N");
        assert_eq!(cardinal_direction(-90.0, Language::English), "W");
    }

    #[test]
    fn test_language_from_tag() {
        assert_eq!(Language::from_tag("de"), Language::German);
        assert_eq!(Language::from_tag("de-AT"), Language::German);
        assert_eq!(Language::from_tag("en"), Language::English);
        assert_eq!(Language::from_tag("system"), Language::English);
        assert_eq!(Language::from_tag(""), Language::English);
    }

    #[test]
    fn test_barometric_altitude() {
        assert_approx_eq(
            barometric_altitude_m(STANDARD_SEA_LEVEL_HPA, STANDARD_SEA_LEVEL_HPA).unwrap(),
            0.0);
        // Roughly 111 m per 13 hPa near sea level
        let altitude = barometric_altitude_m(1000.0, STANDARD_SEA_LEVEL_HPA).unwrap();
        assert!(altitude > 105.0 && altitude < 115.0, "altitude {}", altitude);
        assert!(barometric_altitude_m(0.0, STANDARD_SEA_LEVEL_HPA).is_none());
    }
}
