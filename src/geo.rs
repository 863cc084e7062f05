use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Where an item's coordinate comes from. Adapters return a hint; the
/// orchestrator geocodes addresses and falls back to the summarizer's place
/// guess when nothing else resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationHint {
    Coordinates(GeoPoint),
    Address(String),
    Unknown,
}

/// Pull a lat/lng out of a Google Maps embed/share URL. Sites embed maps in
/// several shapes; each pattern is tried in order.
pub fn extract_latlng(url: &str) -> Option<GeoPoint> {
    // pb=...!3d<lat>!4d<lng>
    let lat_re = Regex::new(r"!3d([0-9.\-]+)").unwrap();
    let lng_re = Regex::new(r"!4d([0-9.\-]+)").unwrap();
    if let (Some(lat), Some(lng)) = (capture_f64(&lat_re, url, 1), capture_f64(&lng_re, url, 1)) {
        return Some(GeoPoint { lat, lng });
    }

    // place form first so its @lat,lng wins over a generic match
    let pair_patterns = [
        r"place/.*/@([0-9.\-]+),([0-9.\-]+)",
        r"@([0-9.\-]+),([0-9.\-]+)(?:,[0-9.\-]+z)?",
        r"[?&]q=([0-9.\-]+),([0-9.\-]+)",
        r"[?&]ll=([0-9.\-]+),([0-9.\-]+)",
    ];
    for pattern in pair_patterns {
        let re = Regex::new(pattern).unwrap();
        if let Some(caps) = re.captures(url) {
            let lat = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let lng = caps.get(2).and_then(|m| m.as_str().parse().ok());
            if let (Some(lat), Some(lng)) = (lat, lng) {
                return Some(GeoPoint { lat, lng });
            }
        }
    }

    None
}

fn capture_f64(re: &Regex, s: &str, group: usize) -> Option<f64> {
    re.captures(s)?.get(group)?.as_str().parse().ok()
}

/// Extract the URL from an inline `background-image: url(...)` style.
pub fn background_image_url(style: &str) -> Option<String> {
    // The regex crate has no backreferences, so spell out each quote style.
    let re = Regex::new(r#"background-image\s*:\s*url\((?:'(.*?)'|"(.*?)"|(.*?))\)"#).unwrap();
    re.captures(style)
        .and_then(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pb_marker_form() {
        let p = extract_latlng("https://www.google.com/maps/embed?pb=!1m18!3d35.0116!4d135.7681").unwrap();
        assert_eq!(p, GeoPoint { lat: 35.0116, lng: 135.7681 });
    }

    #[test]
    fn at_form_with_zoom() {
        let p = extract_latlng("https://www.google.com/maps/@34.6937,135.5023,12z").unwrap();
        assert_eq!(p.lat, 34.6937);
        assert_eq!(p.lng, 135.5023);
    }

    #[test]
    fn q_and_ll_params() {
        assert_eq!(
            extract_latlng("https://maps.google.com/?q=43.0621,141.3544"),
            Some(GeoPoint { lat: 43.0621, lng: 141.3544 })
        );
        assert_eq!(
            extract_latlng("https://maps.google.com/maps?ll=26.2124,127.6809"),
            Some(GeoPoint { lat: 26.2124, lng: 127.6809 })
        );
    }

    #[test]
    fn place_form() {
        let p = extract_latlng("https://www.google.com/maps/place/Nagoya+Castle/@35.1856,136.8998,17z").unwrap();
        assert_eq!(p.lat, 35.1856);
        assert_eq!(p.lng, 136.8998);
    }

    #[test]
    fn unextractable_url() {
        assert_eq!(extract_latlng("https://www.google.com/maps/embed"), None);
    }

    #[test]
    fn background_image_variants() {
        assert_eq!(
            background_image_url("background-image: url('https://cdn/x.jpg')"),
            Some("https://cdn/x.jpg".into())
        );
        assert_eq!(
            background_image_url("color: red; background-image:url(\"/hero.webp\");"),
            Some("/hero.webp".into())
        );
        assert_eq!(background_image_url("color: red"), None);
    }
}
