//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{
    Caller, Category, Rating, Restaurant, RestaurantId, UserId, UserRegistry, Visit, VisitId,
    VisitSummary,
};

/// A clock whose reading only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A restaurant in Seoul with a random id.
pub fn restaurant_at(name: &str, category: Category, created_at: DateTime<Utc>) -> Restaurant {
    Restaurant {
        id: RestaurantId::random(),
        name: name.to_owned(),
        address: format!("{name}, Seoul"),
        latitude: 37.5,
        longitude: 127.0,
        category,
        is_favorite: false,
        created_at,
    }
}

/// A stored visit authored by `minju` on `date`.
///
/// `rating_tenths` uses the stored representation, so `Some(45)` is 4.5.
pub fn stored_visit(
    restaurant_id: RestaurantId,
    menu: &str,
    rating_tenths: Option<u8>,
    date: NaiveDate,
) -> Visit {
    let rating = rating_tenths.map(|tenths| match Rating::from_tenths(tenths) {
        Ok(rating) => rating,
        Err(error) => panic!("invalid test rating {tenths}: {error}"),
    });
    let created_at = match date.and_hms_opt(12, 0, 0) {
        Some(noon) => noon.and_utc(),
        None => panic!("noon is a valid time"),
    };
    let author = match UserId::new("minju") {
        Ok(id) => id,
        Err(error) => panic!("registry user id: {error}"),
    };
    Visit {
        id: VisitId::random(),
        restaurant_id,
        user_id: Some(author),
        menu: menu.to_owned(),
        rating,
        price: None,
        comment: None,
        image: None,
        visited_at: date,
        created_at,
    }
}

/// Listing-shaped variant of [`stored_visit`].
pub fn visit_on(
    restaurant_id: RestaurantId,
    menu: &str,
    rating_tenths: Option<u8>,
    date: NaiveDate,
) -> VisitSummary {
    stored_visit(restaurant_id, menu, rating_tenths, date).summary()
}

/// Caller for a registry user id such as `"minju"` or `"guest"`.
pub fn caller(id: &str) -> Caller {
    let user_id = match UserId::new(id) {
        Ok(user_id) => user_id,
        Err(error) => panic!("invalid test user id {id}: {error}"),
    };
    match UserRegistry.find(&user_id) {
        Some(user) => Caller::new(user),
        None => panic!("{id} is not a registry user"),
    }
}
