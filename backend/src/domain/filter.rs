//! In-memory filtering of an already fetched listing.

use serde::Deserialize;

use super::{Category, RestaurantWithVisits};

/// Filter criteria, applied in order: favourites, category, free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    #[serde(default)]
    pub favorites_only: bool,
    pub category: Option<Category>,
    pub query: Option<String>,
}

impl ListingFilter {
    /// Whether the filter would keep every entry.
    pub fn is_empty(&self) -> bool {
        !self.favorites_only && self.category.is_none() && self.needle().is_none()
    }

    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }

    /// Keep the entries matching every criterion, preserving order.
    ///
    /// # Examples
    /// ```
    /// use lunchlog::domain::ListingFilter;
    ///
    /// let filter = ListingFilter { query: Some("  ".to_owned()), ..Default::default() };
    /// assert!(filter.is_empty());
    /// assert!(filter.apply(Vec::new()).is_empty());
    /// ```
    pub fn apply(&self, listing: Vec<RestaurantWithVisits>) -> Vec<RestaurantWithVisits> {
        let needle = self.needle();
        listing
            .into_iter()
            .filter(|entry| !self.favorites_only || entry.restaurant.is_favorite)
            .filter(|entry| self.category.is_none_or(|category| entry.category() == category))
            .filter(|entry| needle.as_deref().is_none_or(|needle| matches_text(entry, needle)))
            .collect()
    }
}

fn matches_text(entry: &RestaurantWithVisits, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    contains(&entry.restaurant.name)
        || contains(&entry.restaurant.address)
        || entry.visits.iter().any(|visit| contains(&visit.menu))
}
