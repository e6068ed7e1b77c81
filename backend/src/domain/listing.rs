//! Restaurant listings: aggregation of visits, average rating and ordering.
//!
//! Everything here is pure. Repositories hand over restaurants and visit
//! summaries; [`assemble_listing`] groups, derives and sorts them.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Category, Rating, Restaurant, RestaurantId, VisitSummary};

/// Error returned for an unknown sort option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort option: {0}")]
pub struct UnknownSortOption(pub String);

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Creation time, newest first.
    #[default]
    Latest,
    /// Average rating, highest first, unrated last.
    Rating,
    /// Name, ascending.
    Name,
}

impl FromStr for SortOption {
    type Err = UnknownSortOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            other => Err(UnknownSortOption(other.to_owned())),
        }
    }
}

/// Average of one-decimal ratings, itself rounded half-up to one decimal.
///
/// Averages are exact in tenths: the result is
/// `round_half_up(sum / count)` computed in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AverageRating(u32);

impl AverageRating {
    /// Average the given ratings, or `None` when there are none.
    ///
    /// # Examples
    /// ```
    /// use lunchlog::domain::{AverageRating, Rating};
    ///
    /// let ratings = [Rating::from_tenths(35), Rating::from_tenths(40)]
    ///     .into_iter()
    ///     .collect::<Result<Vec<_>, _>>()
    ///     .expect("valid ratings");
    /// let average = AverageRating::of(ratings).expect("rated");
    /// assert_eq!(average.value(), 3.8);
    /// ```
    pub fn of(ratings: impl IntoIterator<Item = Rating>) -> Option<Self> {
        let (sum, count) = ratings
            .into_iter()
            .fold((0_u32, 0_u32), |(sum, count), rating| {
                (sum + u32::from(rating.tenths()), count + 1)
            });
        if count == 0 {
            return None;
        }
        Some(Self((2 * sum + count) / (2 * count)))
    }

    /// The average in tenths.
    pub fn tenths(self) -> u32 {
        self.0
    }

    /// The average as a decimal value.
    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl Serialize for AverageRating {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// A restaurant with its visits and derived figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantWithVisits {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub visits: Vec<VisitSummary>,
    pub average_rating: Option<AverageRating>,
    pub visit_count: usize,
}

impl RestaurantWithVisits {
    /// Derive figures and order visits by visit date, newest first.
    pub fn new(restaurant: Restaurant, mut visits: Vec<VisitSummary>) -> Self {
        visits.sort_by(|a, b| {
            b.visited_at
                .cmp(&a.visited_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        let average_rating = AverageRating::of(visits.iter().filter_map(|visit| visit.rating));
        let visit_count = visits.len();
        Self {
            restaurant,
            visits,
            average_rating,
            visit_count,
        }
    }

    pub fn id(&self) -> RestaurantId {
        self.restaurant.id
    }

    pub fn category(&self) -> Category {
        self.restaurant.category
    }
}

/// Group visits under their restaurants, drop restaurants without visits and
/// order the result.
///
/// `restaurants` should arrive newest first; that order is the base for the
/// stable rating sort.
pub fn assemble_listing(
    restaurants: Vec<Restaurant>,
    visits: Vec<VisitSummary>,
    sort: SortOption,
) -> Vec<RestaurantWithVisits> {
    let mut grouped: HashMap<RestaurantId, Vec<VisitSummary>> = HashMap::new();
    for visit in visits {
        grouped.entry(visit.restaurant_id).or_default().push(visit);
    }

    let mut listing: Vec<RestaurantWithVisits> = restaurants
        .into_iter()
        .filter_map(|restaurant| {
            let visits = grouped.remove(&restaurant.id)?;
            Some(RestaurantWithVisits::new(restaurant, visits))
        })
        .collect();
    sort_listing(&mut listing, sort);
    listing
}

/// Sort a listing in place. All orders are stable.
pub fn sort_listing(listing: &mut [RestaurantWithVisits], sort: SortOption) {
    match sort {
        SortOption::Latest => listing.sort_by(|a, b| {
            b.restaurant.created_at.cmp(&a.restaurant.created_at)
        }),
        SortOption::Name => listing.sort_by(|a, b| a.restaurant.name.cmp(&b.restaurant.name)),
        SortOption::Rating => listing.sort_by(|a, b| compare_ratings_desc(a.average_rating, b.average_rating)),
    }
}

/// Highest first; unrated after every rated entry.
pub(crate) fn compare_ratings_desc(a: Option<AverageRating>, b: Option<AverageRating>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests;
