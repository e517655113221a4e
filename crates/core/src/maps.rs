//! Recycling-centre search links.

use crate::geo::GeoPoint;

const MAPS_SEARCH: &str = "https://www.google.com/maps/search/";
const NEARBY_TERM: &str = "e-waste+recycling+centre";
const DEFAULT_QUERY: &str = "e-waste recycling centre near me";
const NEARBY_ZOOM: u8 = 14;

/// Build a maps URL for finding a recycling centre.
///
/// A valid `point` yields a nearby search anchored at the coordinates; any
/// other input falls back to a text search for `"<query_text> recycling centre
/// near me"`. Always returns a well-formed URL.
pub fn build_link(point: Option<GeoPoint>, query_text: &str) -> String {
    if let Some(p) = point.filter(GeoPoint::is_valid) {
        return format!("{MAPS_SEARCH}{NEARBY_TERM}/@{},{},{NEARBY_ZOOM}z", p.lat, p.lng);
    }

    let query_text = query_text.split_whitespace().collect::<Vec<_>>().join(" ");
    let query = if query_text.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        format!("{query_text} recycling centre near me")
    };
    format!("{MAPS_SEARCH}?api=1&query={}", urlencoding::encode(&query))
}
