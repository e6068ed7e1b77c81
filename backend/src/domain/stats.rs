//! Aggregate statistics over the full, unfiltered listing.

use serde::Serialize;

use super::listing::compare_ratings_desc;
use super::{AverageRating, Category, RestaurantId, RestaurantWithVisits};

/// Length cap on the ranked lists.
pub const TOP_LIMIT: usize = 5;

/// Restaurant and visit counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: Category,
    pub restaurant_count: usize,
    pub visit_count: usize,
}

/// A restaurant entry in a top list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRestaurant {
    pub id: RestaurantId,
    pub name: String,
    pub category: Category,
    pub visit_count: usize,
    pub average_rating: Option<AverageRating>,
}

impl From<&RestaurantWithVisits> for RankedRestaurant {
    fn from(entry: &RestaurantWithVisits) -> Self {
        Self {
            id: entry.restaurant.id,
            name: entry.restaurant.name.clone(),
            category: entry.restaurant.category,
            visit_count: entry.visit_count,
            average_rating: entry.average_rating,
        }
    }
}

/// Statistics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStats {
    pub restaurant_count: usize,
    pub visit_count: usize,
    pub categories: Vec<CategoryBreakdown>,
    pub most_visited: Vec<RankedRestaurant>,
    pub top_rated: Vec<RankedRestaurant>,
}

impl ListingStats {
    /// Derive statistics. Every ordering is stable with respect to the input.
    pub fn from_listing(listing: &[RestaurantWithVisits]) -> Self {
        let visit_count = listing.iter().map(|entry| entry.visit_count).sum();

        let mut categories: Vec<CategoryBreakdown> = Category::ALL
            .into_iter()
            .map(|category| {
                let entries = listing.iter().filter(|entry| entry.category() == category);
                let (restaurant_count, visit_count) = entries
                    .fold((0, 0), |(restaurants, visits), entry| {
                        (restaurants + 1, visits + entry.visit_count)
                    });
                CategoryBreakdown {
                    category,
                    restaurant_count,
                    visit_count,
                }
            })
            .filter(|breakdown| breakdown.restaurant_count > 0)
            .collect();
        categories.sort_by(|a, b| b.restaurant_count.cmp(&a.restaurant_count));

        let mut by_visits: Vec<&RestaurantWithVisits> = listing.iter().collect();
        by_visits.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));
        let most_visited = by_visits
            .into_iter()
            .take(TOP_LIMIT)
            .map(RankedRestaurant::from)
            .collect();

        let mut by_rating: Vec<&RestaurantWithVisits> = listing
            .iter()
            .filter(|entry| entry.average_rating.is_some())
            .collect();
        by_rating.sort_by(|a, b| compare_ratings_desc(a.average_rating, b.average_rating));
        let top_rated = by_rating
            .into_iter()
            .take(TOP_LIMIT)
            .map(RankedRestaurant::from)
            .collect();

        Self {
            restaurant_count: listing.len(),
            visit_count,
            categories,
            most_visited,
            top_rated,
        }
    }
}
