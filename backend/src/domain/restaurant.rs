//! Restaurant records and their categories.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque restaurant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(Uuid);

impl RestaurantId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RestaurantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Error returned when a category label is not one of the six known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Cuisine category, serialised with its Korean label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "한식")]
    Korean,
    #[serde(rename = "중식")]
    Chinese,
    #[serde(rename = "일식")]
    Japanese,
    #[serde(rename = "양식")]
    Western,
    #[serde(rename = "분식")]
    Snack,
    #[serde(rename = "기타")]
    Other,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Category; 6] = [
        Self::Korean,
        Self::Chinese,
        Self::Japanese,
        Self::Western,
        Self::Snack,
        Self::Other,
    ];

    /// The stored and serialised label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Korean => "한식",
            Self::Chinese => "중식",
            Self::Japanese => "일식",
            Self::Western => "양식",
            Self::Snack => "분식",
            Self::Other => "기타",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// A stored restaurant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// Validation errors raised by [`NewRestaurant::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestaurantValidationError {
    #[error("name must not be empty")]
    BlankName,
    #[error("address must not be empty")]
    BlankAddress,
    #[error("latitude must be a finite value within [-90, 90]")]
    LatitudeOutOfRange,
    #[error("longitude must be a finite value within [-180, 180]")]
    LongitudeOutOfRange,
}

/// Unvalidated input for [`NewRestaurant::new`].
#[derive(Debug, Clone)]
pub struct NewRestaurantDraft {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
}

/// A validated restaurant ready to be stored.
///
/// ## Invariants
/// - `name` and `address` are trimmed and non-empty.
/// - `latitude` lies within [-90, 90] and `longitude` within [-180, 180].
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
    category: Category,
}

impl NewRestaurant {
    /// Validate a draft.
    ///
    /// # Examples
    /// ```
    /// use lunchlog::domain::{Category, NewRestaurant, NewRestaurantDraft};
    ///
    /// let restaurant = NewRestaurant::new(NewRestaurantDraft {
    ///     name: "Kim's BBQ".to_owned(),
    ///     address: "Seoul".to_owned(),
    ///     latitude: 37.5,
    ///     longitude: 127.0,
    ///     category: Category::Korean,
    /// })
    /// .expect("valid restaurant");
    /// assert_eq!(restaurant.name(), "Kim's BBQ");
    /// ```
    pub fn new(draft: NewRestaurantDraft) -> Result<Self, RestaurantValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(RestaurantValidationError::BlankName);
        }
        let address = draft.address.trim();
        if address.is_empty() {
            return Err(RestaurantValidationError::BlankAddress);
        }
        if !draft.latitude.is_finite() || !(-90.0..=90.0).contains(&draft.latitude) {
            return Err(RestaurantValidationError::LatitudeOutOfRange);
        }
        if !draft.longitude.is_finite() || !(-180.0..=180.0).contains(&draft.longitude) {
            return Err(RestaurantValidationError::LongitudeOutOfRange);
        }
        Ok(Self {
            name: name.to_owned(),
            address: address.to_owned(),
            latitude: draft.latitude,
            longitude: draft.longitude,
            category: draft.category,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Materialise the stored record: fresh id, not a favourite.
    pub fn into_restaurant(self, id: RestaurantId, created_at: DateTime<Utc>) -> Restaurant {
        Restaurant {
            id,
            name: self.name,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            category: self.category,
            is_favorite: false,
            created_at,
        }
    }
}
