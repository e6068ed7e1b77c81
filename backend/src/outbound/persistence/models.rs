//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain types at the boundary.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::dsl::IsNotNull;
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{restaurants, visits};

/// Row struct for reading from the restaurants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating restaurant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = restaurants)]
pub(crate) struct NewRestaurantRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub address: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub category: &'a str,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// Full visit row, image bytes included.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VisitRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Option<String>,
    pub menu: String,
    pub rating: Option<BigDecimal>,
    pub price: Option<String>,
    pub comment: Option<String>,
    pub image: Option<Vec<u8>>,
    pub visited_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Listing-shaped visit row; the image column is reduced to a null check so
/// the bytes never leave the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VisitSummaryRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Option<String>,
    pub menu: String,
    pub rating: Option<BigDecimal>,
    pub price: Option<String>,
    pub comment: Option<String>,
    #[diesel(select_expression = visits::image.is_not_null())]
    #[diesel(select_expression_type = IsNotNull<visits::image>)]
    pub has_image: bool,
    pub visited_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating visit records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visits)]
pub(crate) struct NewVisitRow<'a> {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Option<&'a str>,
    pub menu: &'a str,
    pub rating: Option<BigDecimal>,
    pub price: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub image: Option<&'a [u8]>,
    pub visited_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Changeset for the editable visit fields other than the image.
///
/// `None` writes `NULL`; clearing an optional field is a normal edit.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = visits)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VisitDetailsUpdate<'a> {
    pub menu: &'a str,
    pub rating: Option<BigDecimal>,
    pub price: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub visited_at: NaiveDate,
}
