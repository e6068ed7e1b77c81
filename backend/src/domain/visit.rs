//! Visits: dated records of eating at a restaurant.
//!
//! Images are stored inline as raw bytes but never leave the domain inside a
//! listing. [`VisitSummary`] carries a `has_image` flag instead; the bytes are
//! served separately.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RestaurantId, UserId};

/// Opaque visit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitId(Uuid);

impl VisitId {
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

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for VisitId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Smallest and largest rating, in tenths.
const RATING_MIN_TENTHS: u8 = 5;
const RATING_MAX_TENTHS: u8 = 50;
/// Slack for binary representations such as `3.3 * 10 = 32.999...`.
const TENTHS_EPSILON: f64 = 1e-6;

/// Validation errors raised by visit constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitValidationError {
    #[error("menu must not be empty")]
    BlankMenu,
    #[error("rating must be between 0.5 and 5.0")]
    RatingOutOfRange,
    #[error("rating must have at most one decimal place")]
    RatingTooPrecise,
}

/// A rating with one fractional digit, stored as tenths (`4.5` is `45`).
///
/// ## Invariants
/// - The value lies within 0.5..=5.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    /// Construct from tenths.
    pub fn from_tenths(tenths: u8) -> Result<Self, VisitValidationError> {
        if (RATING_MIN_TENTHS..=RATING_MAX_TENTHS).contains(&tenths) {
            Ok(Self(tenths))
        } else {
            Err(VisitValidationError::RatingOutOfRange)
        }
    }

    /// Construct from a decimal value with at most one fractional digit.
    ///
    /// # Examples
    /// ```
    /// use lunchlog::domain::Rating;
    ///
    /// let rating = Rating::from_f64(4.5).expect("in range");
    /// assert_eq!(rating.tenths(), 45);
    /// assert!(Rating::from_f64(4.46).is_err());
    /// assert!(Rating::from_f64(5.5).is_err());
    /// ```
    pub fn from_f64(value: f64) -> Result<Self, VisitValidationError> {
        if !value.is_finite() {
            return Err(VisitValidationError::RatingOutOfRange);
        }
        let scaled = value * 10.0;
        let tenths = scaled.round();
        if tenths < f64::from(RATING_MIN_TENTHS) || tenths > f64::from(RATING_MAX_TENTHS) {
            return Err(VisitValidationError::RatingOutOfRange);
        }
        if (scaled - tenths).abs() > TENTHS_EPSILON {
            return Err(VisitValidationError::RatingTooPrecise);
        }
        // Range checked above, so the cast is exact.
        Self::from_tenths(tenths as u8)
    }

    /// The rating in tenths.
    pub fn tenths(self) -> u8 {
        self.0
    }

    /// The rating as a decimal value.
    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl Serialize for Rating {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_f64(value).map_err(serde::de::Error::custom)
    }
}

/// Error returned when a price tier label is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown price tier: {0}")]
pub struct UnknownPriceTier(pub String);

/// Ordinal price bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceTier {
    Low,
    Mid,
    High,
}

impl PriceTier {
    /// Stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Mid => "MID",
            Self::High => "HIGH",
        }
    }
}

impl FromStr for PriceTier {
    type Err = UnknownPriceTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MID" => Ok(Self::Mid),
            "HIGH" => Ok(Self::High),
            other => Err(UnknownPriceTier(other.to_owned())),
        }
    }
}

/// Unvalidated visit fields shared by create and update.
#[derive(Debug, Clone)]
pub struct VisitDetailsDraft {
    pub menu: String,
    pub rating: Option<Rating>,
    pub price: Option<PriceTier>,
    pub comment: Option<String>,
    pub visited_at: NaiveDate,
}

/// Validated visit fields shared by create and update.
///
/// ## Invariants
/// - `menu` is trimmed and non-empty.
/// - `comment` is `None` rather than blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDetails {
    menu: String,
    rating: Option<Rating>,
    price: Option<PriceTier>,
    comment: Option<String>,
    visited_at: NaiveDate,
}

impl VisitDetails {
    /// Validate a draft.
    pub fn new(draft: VisitDetailsDraft) -> Result<Self, VisitValidationError> {
        let menu = draft.menu.trim();
        if menu.is_empty() {
            return Err(VisitValidationError::BlankMenu);
        }
        let comment = draft
            .comment
            .map(|comment| comment.trim().to_owned())
            .filter(|comment| !comment.is_empty());
        Ok(Self {
            menu: menu.to_owned(),
            rating: draft.rating,
            price: draft.price,
            comment,
            visited_at: draft.visited_at,
        })
    }

    pub fn menu(&self) -> &str {
        self.menu.as_str()
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn price(&self) -> Option<PriceTier> {
        self.price
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn visited_at(&self) -> NaiveDate {
        self.visited_at
    }
}

/// How an update treats the stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUpdate {
    /// Store new bytes.
    Replace(Vec<u8>),
    /// Remove the stored image.
    Clear,
    /// Leave the stored image untouched.
    Keep,
}

impl ImageUpdate {
    /// New bytes win; otherwise `keep_existing` decides between keeping and
    /// clearing.
    ///
    /// # Examples
    /// ```
    /// use lunchlog::domain::ImageUpdate;
    ///
    /// assert_eq!(ImageUpdate::resolve(None, true), ImageUpdate::Keep);
    /// assert_eq!(ImageUpdate::resolve(None, false), ImageUpdate::Clear);
    /// assert_eq!(
    ///     ImageUpdate::resolve(Some(vec![1]), true),
    ///     ImageUpdate::Replace(vec![1])
    /// );
    /// ```
    pub fn resolve(image: Option<Vec<u8>>, keep_existing: bool) -> Self {
        match (image, keep_existing) {
            (Some(bytes), _) => Self::Replace(bytes),
            (None, true) => Self::Keep,
            (None, false) => Self::Clear,
        }
    }

    /// Apply the policy to the stored image.
    pub fn apply(self, stored: Option<Vec<u8>>) -> Option<Vec<u8>> {
        match self {
            Self::Replace(bytes) => Some(bytes),
            Self::Clear => None,
            Self::Keep => stored,
        }
    }
}

/// A stored visit including its image bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub id: VisitId,
    pub restaurant_id: RestaurantId,
    pub user_id: Option<UserId>,
    pub menu: String,
    pub rating: Option<Rating>,
    pub price: Option<PriceTier>,
    pub comment: Option<String>,
    pub image: Option<Vec<u8>>,
    pub visited_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Visit {
    /// Build a new visit from validated details.
    pub fn create(
        id: VisitId,
        restaurant_id: RestaurantId,
        author: UserId,
        details: VisitDetails,
        image: Option<Vec<u8>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let VisitDetails {
            menu,
            rating,
            price,
            comment,
            visited_at,
        } = details;
        Self {
            id,
            restaurant_id,
            user_id: Some(author),
            menu,
            rating,
            price,
            comment,
            image,
            visited_at,
            created_at,
        }
    }

    /// Overwrite the editable fields, applying the image policy.
    pub fn apply(&mut self, details: VisitDetails, image: ImageUpdate) {
        self.menu = details.menu;
        self.rating = details.rating;
        self.price = details.price;
        self.comment = details.comment;
        self.visited_at = details.visited_at;
        self.image = image.apply(self.image.take());
    }

    /// Shape for listings: the image is reduced to a flag.
    pub fn summary(&self) -> VisitSummary {
        VisitSummary {
            id: self.id,
            restaurant_id: self.restaurant_id,
            user_id: self.user_id.clone(),
            menu: self.menu.clone(),
            rating: self.rating,
            price: self.price,
            comment: self.comment.clone(),
            has_image: self.image.is_some(),
            visited_at: self.visited_at,
            created_at: self.created_at,
        }
    }
}

/// A visit without its image bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitSummary {
    pub id: VisitId,
    pub restaurant_id: RestaurantId,
    pub user_id: Option<UserId>,
    pub menu: String,
    pub rating: Option<Rating>,
    pub price: Option<PriceTier>,
    pub comment: Option<String>,
    pub has_image: bool,
    pub visited_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}
