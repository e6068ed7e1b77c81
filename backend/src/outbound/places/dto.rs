//! DTOs for decoding Naver local search responses.
//!
//! The adapter decodes into these transport DTOs first, then maps them into
//! [`PlaceCandidate`]s in one pass.

use serde::Deserialize;

use crate::domain::{PlaceCandidate, convert_provider_coordinates};

#[derive(Debug, Deserialize)]
pub(super) struct LocalSearchResponseDto {
    #[serde(default)]
    pub(super) items: Vec<LocalSearchItemDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocalSearchItemDto {
    pub(super) title: String,
    #[serde(default)]
    pub(super) category: String,
    #[serde(default)]
    pub(super) address: String,
    #[serde(default)]
    pub(super) road_address: String,
    pub(super) mapx: String,
    pub(super) mapy: String,
}

impl LocalSearchResponseDto {
    pub(super) fn into_candidates(self) -> Result<Vec<PlaceCandidate>, String> {
        self.items
            .into_iter()
            .map(LocalSearchItemDto::into_candidate)
            .collect()
    }
}

impl LocalSearchItemDto {
    fn into_candidate(self) -> Result<PlaceCandidate, String> {
        let name = strip_html_tags(&self.title);
        let mapx = parse_coordinate(&self.mapx, "mapx", &name)?;
        let mapy = parse_coordinate(&self.mapy, "mapy", &name)?;
        let coordinates = convert_provider_coordinates(mapx, mapy);
        Ok(PlaceCandidate {
            name,
            address: self.address,
            road_address: self.road_address,
            category: self.category,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        })
    }
}

fn parse_coordinate(raw: &str, field: &str, name: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|error| format!("item {name:?} has invalid {field} {raw:?}: {error}"))
}

/// Remove `<...>` markup; the provider wraps matched terms in `<b>` tags.
pub(super) fn strip_html_tags(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }
    stripped
}
