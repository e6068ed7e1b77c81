//! Place search candidates and provider coordinate conversion.

use serde::Serialize;

/// Maximum accepted query length, in characters.
const QUERY_MAX_CHARS: usize = 100;

/// Scale of the provider's integer coordinates (degrees × 10⁷).
const PROVIDER_COORDINATE_SCALE: f64 = 10_000_000.0;

/// Validation errors raised by [`PlaceQuery::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceQueryError {
    #[error("query must not be empty")]
    Blank,
    #[error("query must be at most {max} characters")]
    TooLong { max: usize },
}

/// A trimmed, non-empty free-text place query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery(String);

impl PlaceQuery {
    /// Validate a raw query.
    pub fn new(raw: &str) -> Result<Self, PlaceQueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PlaceQueryError::Blank);
        }
        if trimmed.chars().count() > QUERY_MAX_CHARS {
            return Err(PlaceQueryError::TooLong {
                max: QUERY_MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Standard WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Convert the provider's integer encoding (`mapx` longitude and `mapy`
/// latitude, both degrees × 10⁷) to standard coordinates.
///
/// # Examples
/// ```
/// use lunchlog::domain::convert_provider_coordinates;
///
/// let coordinates = convert_provider_coordinates(1_270_276_543, 374_979_502);
/// assert_eq!(coordinates.longitude, 127.0276543);
/// assert_eq!(coordinates.latitude, 37.4979502);
/// ```
pub fn convert_provider_coordinates(mapx: i64, mapy: i64) -> Coordinates {
    Coordinates {
        latitude: mapy as f64 / PROVIDER_COORDINATE_SCALE,
        longitude: mapx as f64 / PROVIDER_COORDINATE_SCALE,
    }
}

/// A candidate place returned by a search provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    pub name: String,
    pub address: String,
    pub road_address: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn converts_provider_coordinates() {
        let coordinates = convert_provider_coordinates(1_270_276_543, 374_979_502);
        assert_eq!(coordinates.longitude, 127.0276543);
        assert_eq!(coordinates.latitude, 37.4979502);
    }

    #[rstest]
    fn converts_negative_coordinates() {
        let coordinates = convert_provider_coordinates(-1_225_000_000, -338_000_000);
        assert_eq!(coordinates.longitude, -122.5);
        assert_eq!(coordinates.latitude, -33.8);
    }

    #[rstest]
    #[case("  강남 맛집 ", Ok("강남 맛집"))]
    #[case("   ", Err(PlaceQueryError::Blank))]
    fn validates_queries(#[case] raw: &str, #[case] expected: Result<&str, PlaceQueryError>) {
        let parsed = PlaceQuery::new(raw);
        assert_eq!(parsed.as_ref().map(PlaceQuery::as_str), expected.as_ref().map(|s| *s));
    }

    #[rstest]
    fn rejects_overlong_queries() {
        let raw = "가".repeat(QUERY_MAX_CHARS + 1);
        assert_eq!(
            PlaceQuery::new(&raw),
            Err(PlaceQueryError::TooLong {
                max: QUERY_MAX_CHARS
            })
        );
    }
}
