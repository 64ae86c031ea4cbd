/**
 * Builds map links for a coordinate pair and hands them to the system URL
 * opener.
 */
use std::io;

use crate::coordinate::parse_coordinate;

const WEB_MAPS_URL: &str = "https://www.google.com/maps";


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapsLink {
    pub latitude: f64,
    pub longitude: f64,
}


impl MapsLink {
    pub fn new(latitude: f64, longitude: f64) -> MapsLink {
        MapsLink { latitude, longitude }
    }

    /**
     * Parses both coordinates from metadata strings. Returns None if either
     * one is unavailable, in which case there is nothing to link to.
     */
    pub fn from_coordinates(
        latitude: Option<&str>,
        latitude_ref: Option<&str>,
        longitude: Option<&str>,
        longitude_ref: Option<&str>,
    ) -> Option<MapsLink> {
        let latitude_d = parse_coordinate(latitude, latitude_ref);
        let longitude_d = parse_coordinate(longitude, longitude_ref);
        match (latitude_d, longitude_d) {
            (Some(lat), Some(lon)) => Some(MapsLink::new(lat, lon)),
            _ => {
                warn!(
                    "Coordinates unavailable: latitude {:?} {:?}, longitude {:?} {:?}",
                    latitude,
                    latitude_ref,
                    longitude,
                    longitude_ref);
                None
            }
        }
    }

    pub fn web_url(&self) -> String {
        format!("{}?q={},{}", WEB_MAPS_URL, self.latitude, self.longitude)
    }

    /**
     * Returns a geo: URI with a labelled pin, as understood by mobile map
     * applications.
     */
    pub fn geo_uri(&self, label: &str) -> String {
        format!(
            "geo:{lat},{lon}?q={lat},{lon}({label})",
            lat = self.latitude,
            lon = self.longitude,
            label = encode_label(label))
    }

    /**
     * Opens the web URL in the default browser.
     */
    pub fn open(&self) -> io::Result<()> {
        let url = self.web_url();
        info!("Opening {}", url);
        open::that(&url)
    }
}


/**
 * Percent-encodes everything outside the unreserved URI characters.
 */
fn encode_label(label: &str) -> String {
    let mut encoded = String::with_capacity(label.len());
    for byte in label.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}


#[cfg(test)]
mod tests {
    use super::{encode_label, MapsLink};

    #[test]
    fn test_web_url() {
        let link = MapsLink::new(48.5, -105.25);
        assert_eq!(link.web_url(), "https://www.google.com/maps?q=48.5,-105.25");
    }

    #[test]
    fn test_geo_uri() {
        let link = MapsLink::new(48.5, 14.25);
        assert_eq!(link.geo_uri("Here"), "geo:48.5,14.25?q=48.5,14.25(Here)");
        assert_eq!(
            link.geo_uri("My spot"),
            "geo:48.5,14.25?q=48.5,14.25(My%20spot)");
    }

    #[test]
    fn test_encode_label() {
        assert_eq!(encode_label("Mein Standort"), "Mein%20Standort");
        assert_eq!(encode_label("Straße"), "Stra%C3%9Fe");
        assert_eq!(encode_label("a-b_c.d~e"), "a-b_c.d~e");
    }

    #[test]
    fn test_from_coordinates() {
        let link = MapsLink::from_coordinates(
            Some("45°30'0\""),
            Some("N"),
            Some("4,15,30,5"),
            Some("W"),
        ).unwrap();
        assert!((link.latitude - 45.5).abs() < 0.000001);
        assert!((link.longitude + (4.0 + 15.0 / 60.0 + 30.5 / 3600.0)).abs() < 0.000001);
    }

    #[test]
    fn test_from_coordinates_missing() {
        assert!(MapsLink::from_coordinates(None, Some("N"), Some("10"), Some("E")).is_none());
        assert!(MapsLink::from_coordinates(Some("10"), Some("N"), Some(""), Some("E")).is_none());
    }
}
