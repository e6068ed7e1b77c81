//! In-memory restaurant and visit store.
//!
//! Backs both repository ports when no database is configured, and serves as
//! the store for HTTP integration tests. Deleting a restaurant removes its
//! visits, and inserting a visit for an unknown restaurant fails, matching
//! the PostgreSQL constraints.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    RestaurantRepository, RestaurantRepositoryError, VisitRepository, VisitRepositoryError,
};
use crate::domain::{
    Category, ImageUpdate, Restaurant, RestaurantId, Visit, VisitDetails, VisitId, VisitSummary,
};

#[derive(Debug, Default)]
struct StoreState {
    restaurants: Vec<Restaurant>,
    visits: Vec<Visit>,
}

/// Store shared through `Arc`; implements both repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Option<RwLockReadGuard<'_, StoreState>> {
        self.state.read().ok()
    }

    fn write(&self) -> Option<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().ok()
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryStore {
    async fn list(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Restaurant>, RestaurantRepositoryError> {
        let state = self
            .read()
            .ok_or_else(|| RestaurantRepositoryError::connection(POISONED))?;
        let mut restaurants: Vec<Restaurant> = state
            .restaurants
            .iter()
            .filter(|restaurant| category.is_none_or(|wanted| restaurant.category == wanted))
            .cloned()
            .collect();
        restaurants.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(restaurants)
    }

    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        let state = self
            .read()
            .ok_or_else(|| RestaurantRepositoryError::connection(POISONED))?;
        Ok(state
            .restaurants
            .iter()
            .find(|restaurant| restaurant.id == *id)
            .cloned())
    }

    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError> {
        let mut state = self
            .write()
            .ok_or_else(|| RestaurantRepositoryError::connection(POISONED))?;
        if state.restaurants.iter().any(|existing| existing.id == restaurant.id) {
            return Err(RestaurantRepositoryError::query(format!(
                "restaurant {} already exists",
                restaurant.id
            )));
        }
        state.restaurants.push(restaurant.clone());
        Ok(())
    }

    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantRepositoryError> {
        let mut state = self
            .write()
            .ok_or_else(|| RestaurantRepositoryError::connection(POISONED))?;
        let before = state.restaurants.len();
        state.restaurants.retain(|restaurant| restaurant.id != *id);
        let deleted = state.restaurants.len() != before;
        if deleted {
            state.visits.retain(|visit| visit.restaurant_id != *id);
        }
        Ok(deleted)
    }

    async fn toggle_favorite(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        let mut state = self
            .write()
            .ok_or_else(|| RestaurantRepositoryError::connection(POISONED))?;
        Ok(state
            .restaurants
            .iter_mut()
            .find(|restaurant| restaurant.id == *id)
            .map(|restaurant| {
                restaurant.is_favorite = !restaurant.is_favorite;
                restaurant.clone()
            }))
    }
}

#[async_trait]
impl VisitRepository for InMemoryStore {
    async fn list_summaries_for(
        &self,
        restaurant_ids: &[RestaurantId],
    ) -> Result<Vec<VisitSummary>, VisitRepositoryError> {
        let state = self
            .read()
            .ok_or_else(|| VisitRepositoryError::connection(POISONED))?;
        Ok(state
            .visits
            .iter()
            .filter(|visit| restaurant_ids.contains(&visit.restaurant_id))
            .map(Visit::summary)
            .collect())
    }

    async fn find_by_id(&self, id: &VisitId) -> Result<Option<Visit>, VisitRepositoryError> {
        let state = self
            .read()
            .ok_or_else(|| VisitRepositoryError::connection(POISONED))?;
        Ok(state.visits.iter().find(|visit| visit.id == *id).cloned())
    }

    async fn insert(&self, visit: &Visit) -> Result<(), VisitRepositoryError> {
        let mut state = self
            .write()
            .ok_or_else(|| VisitRepositoryError::connection(POISONED))?;
        if !state
            .restaurants
            .iter()
            .any(|restaurant| restaurant.id == visit.restaurant_id)
        {
            return Err(VisitRepositoryError::query(format!(
                "restaurant {} does not exist",
                visit.restaurant_id
            )));
        }
        state.visits.push(visit.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &VisitId,
        details: &VisitDetails,
        image: &ImageUpdate,
    ) -> Result<Option<VisitSummary>, VisitRepositoryError> {
        let mut state = self
            .write()
            .ok_or_else(|| VisitRepositoryError::connection(POISONED))?;
        Ok(state
            .visits
            .iter_mut()
            .find(|visit| visit.id == *id)
            .map(|visit| {
                visit.apply(details.clone(), image.clone());
                visit.summary()
            }))
    }

    async fn delete(&self, id: &VisitId) -> Result<bool, VisitRepositoryError> {
        let mut state = self
            .write()
            .ok_or_else(|| VisitRepositoryError::connection(POISONED))?;
        let before = state.visits.len();
        state.visits.retain(|visit| visit.id != *id);
        Ok(state.visits.len() != before)
    }

    async fn find_image(&self, id: &VisitId) -> Result<Option<Vec<u8>>, VisitRepositoryError> {
        let state = self
            .read()
            .ok_or_else(|| VisitRepositoryError::connection(POISONED))?;
        Ok(state
            .visits
            .iter()
            .find(|visit| visit.id == *id)
            .and_then(|visit| visit.image.clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::test_support::{restaurant_at, stored_visit};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date")
    }

    #[fixture]
    fn base_time() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn lists_newest_first_and_filters_by_category(base_time: chrono::DateTime<Utc>) {
        let store = InMemoryStore::new();
        let old = restaurant_at("Old", Category::Korean, base_time);
        let new = restaurant_at("New", Category::Korean, base_time + Duration::hours(1));
        let other = restaurant_at("Other", Category::Japanese, base_time);
        for restaurant in [&old, &new, &other] {
            RestaurantRepository::insert(&store, restaurant)
                .await
                .expect("insert");
        }

        let korean = store.list(Some(Category::Korean)).await.expect("list");
        let names: Vec<&str> = korean.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["New", "Old"]);
        assert_eq!(store.list(None).await.expect("list").len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_restaurant_cascades(base_time: chrono::DateTime<Utc>) {
        let store = InMemoryStore::new();
        let restaurant = restaurant_at("Kim's BBQ", Category::Korean, base_time);
        RestaurantRepository::insert(&store, &restaurant)
            .await
            .expect("insert restaurant");
        let visit = stored_visit(restaurant.id, "Galbi", Some(45), date(2));
        VisitRepository::insert(&store, &visit)
            .await
            .expect("insert visit");

        assert!(RestaurantRepository::delete(&store, &restaurant.id)
            .await
            .expect("delete"));
        let found = VisitRepository::find_by_id(&store, &visit.id)
            .await
            .expect("lookup");
        assert!(found.is_none());
        assert!(!RestaurantRepository::delete(&store, &restaurant.id)
            .await
            .expect("second delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn visits_need_an_existing_restaurant() {
        let store = InMemoryStore::new();
        let visit = stored_visit(RestaurantId::random(), "Galbi", None, date(2));
        let error = VisitRepository::insert(&store, &visit)
            .await
            .expect_err("orphan visit");
        assert!(matches!(error, VisitRepositoryError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn toggling_twice_restores_the_flag(base_time: chrono::DateTime<Utc>) {
        let store = InMemoryStore::new();
        let restaurant = restaurant_at("Kim's BBQ", Category::Korean, base_time);
        RestaurantRepository::insert(&store, &restaurant)
            .await
            .expect("insert");

        let first = store
            .toggle_favorite(&restaurant.id)
            .await
            .expect("toggle")
            .expect("present");
        let second = store
            .toggle_favorite(&restaurant.id)
            .await
            .expect("toggle")
            .expect("present");
        assert!(first.is_favorite);
        assert!(!second.is_favorite);
    }

    #[rstest]
    #[tokio::test]
    async fn image_updates_follow_the_policy(base_time: chrono::DateTime<Utc>) {
        let store = InMemoryStore::new();
        let restaurant = restaurant_at("Kim's BBQ", Category::Korean, base_time);
        RestaurantRepository::insert(&store, &restaurant)
            .await
            .expect("insert restaurant");
        let mut visit = stored_visit(restaurant.id, "Galbi", None, date(2));
        visit.image = Some(vec![0xFF, 0xD8]);
        VisitRepository::insert(&store, &visit)
            .await
            .expect("insert visit");
        let details = VisitDetails::new(crate::domain::VisitDetailsDraft {
            menu: "Galbi".to_owned(),
            rating: None,
            price: None,
            comment: None,
            visited_at: date(2),
        })
        .expect("details");

        let kept = store
            .update(&visit.id, &details, &ImageUpdate::Keep)
            .await
            .expect("update")
            .expect("present");
        assert!(kept.has_image);
        assert_eq!(
            store.find_image(&visit.id).await.expect("image"),
            Some(vec![0xFF, 0xD8])
        );

        let cleared = store
            .update(&visit.id, &details, &ImageUpdate::Clear)
            .await
            .expect("update")
            .expect("present");
        assert!(!cleared.has_image);
        assert_eq!(store.find_image(&visit.id).await.expect("image"), None);
    }
}
