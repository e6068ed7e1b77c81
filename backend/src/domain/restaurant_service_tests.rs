//! Tests for the restaurant service.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    CacheGeneration, MockListingCache, MockRestaurantRepository, MockVisitRepository,
    NoOpListingCache,
};
use crate::domain::{
    ErrorCode, ImageUpdate, NewRestaurantDraft, Visit, VisitDetails, VisitId, VisitSummary,
};
use crate::outbound::cache::{CachePolicy, InMemoryListingCache};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::{caller, restaurant_at, stored_visit, visit_on};

type MockedService =
    RestaurantService<MockRestaurantRepository, MockVisitRepository, MockListingCache>;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date")
}

fn clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock
        .expect_utc()
        .returning(|| Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    Arc::new(clock)
}

fn make_service(
    restaurants: MockRestaurantRepository,
    visits: MockVisitRepository,
    cache: MockListingCache,
) -> MockedService {
    RestaurantService::new(Arc::new(restaurants), Arc::new(visits), Arc::new(cache), clock())
}

#[fixture]
fn kims_bbq() -> Restaurant {
    restaurant_at(
        "Kim's BBQ",
        Category::Korean,
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
    )
}

fn new_restaurant() -> NewRestaurant {
    NewRestaurant::new(NewRestaurantDraft {
        name: "Kim's BBQ".to_owned(),
        address: "1 Gangnam-daero".to_owned(),
        latitude: 37.4979,
        longitude: 127.0276,
        category: Category::Korean,
    })
    .expect("valid restaurant")
}

fn cache_miss() -> MockListingCache {
    let mut cache = MockListingCache::new();
    cache
        .expect_generation()
        .returning(|| Ok(CacheGeneration::default()));
    cache.expect_listing().returning(|_| Ok(None));
    cache.expect_store_listing().returning(|_, _, _| Ok(()));
    cache.expect_restaurant().returning(|_| Ok(None));
    cache.expect_store_restaurant().returning(|_, _| Ok(()));
    cache
}

#[rstest]
#[tokio::test]
async fn fresh_cached_listing_skips_the_store(kims_bbq: Restaurant) {
    let cached = assemble_listing(
        vec![kims_bbq.clone()],
        vec![visit_on(kims_bbq.id, "Galbi", Some(45), date(2))],
        SortOption::Latest,
    );
    let mut cache = MockListingCache::new();
    let expected = cached.clone();
    cache
        .expect_listing()
        .times(1)
        .return_once(move |_| Ok(Some(cached)));

    let service = make_service(
        MockRestaurantRepository::new(),
        MockVisitRepository::new(),
        cache,
    );
    let listing = service
        .list_restaurants(None, SortOption::Latest)
        .await
        .expect("listing");
    assert_eq!(listing, expected);
}

#[rstest]
#[tokio::test]
async fn cache_miss_loads_assembles_and_stores(kims_bbq: Restaurant) {
    let mut restaurants = MockRestaurantRepository::new();
    let rows = vec![kims_bbq.clone()];
    restaurants
        .expect_list()
        .withf(|category| *category == Some(Category::Korean))
        .times(1)
        .return_once(move |_| Ok(rows));

    let mut visits = MockVisitRepository::new();
    let id = kims_bbq.id;
    visits
        .expect_list_summaries_for()
        .withf(move |ids| ids == [id].as_slice())
        .times(1)
        .return_once(move |_| {
            Ok(vec![
                visit_on(id, "Galbi", Some(45), date(2)),
                visit_on(id, "Bulgogi", Some(35), date(3)),
            ])
        });

    let mut cache = MockListingCache::new();
    cache.expect_listing().times(1).returning(|_| Ok(None));
    cache
        .expect_generation()
        .times(1)
        .returning(|| Ok(CacheGeneration::new(7)));
    cache
        .expect_store_listing()
        .withf(|key, listing, loaded_at| {
            *key == ListingKey::new(Some(Category::Korean), SortOption::Rating)
                && listing.len() == 1
                && *loaded_at == CacheGeneration::new(7)
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let service = make_service(restaurants, visits, cache);
    let listing = service
        .list_restaurants(Some(Category::Korean), SortOption::Rating)
        .await
        .expect("listing");

    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].visit_count, 2);
    assert_eq!(listing[0].average_rating.map(|avg| avg.tenths()), Some(40));
}

#[rstest]
#[tokio::test]
async fn empty_store_skips_visit_query() {
    let mut restaurants = MockRestaurantRepository::new();
    restaurants.expect_list().return_once(|_| Ok(Vec::new()));

    let service = make_service(restaurants, MockVisitRepository::new(), cache_miss());
    let listing = service
        .list_restaurants(None, SortOption::Latest)
        .await
        .expect("listing");
    assert!(listing.is_empty());
}

#[rstest]
#[tokio::test]
async fn cache_failures_fall_back_to_the_store(kims_bbq: Restaurant) {
    let mut restaurants = MockRestaurantRepository::new();
    let rows = vec![kims_bbq.clone()];
    restaurants.expect_list().return_once(move |_| Ok(rows));
    let mut visits = MockVisitRepository::new();
    let id = kims_bbq.id;
    visits
        .expect_list_summaries_for()
        .return_once(move |_| Ok(vec![visit_on(id, "Galbi", None, date(2))]));

    let mut cache = MockListingCache::new();
    cache
        .expect_listing()
        .returning(|_| Err(ListingCacheError::backend("poisoned")));
    cache
        .expect_generation()
        .returning(|| Err(ListingCacheError::backend("poisoned")));
    cache.expect_store_listing().never();

    let service = make_service(restaurants, visits, cache);
    let listing = service
        .list_restaurants(None, SortOption::Latest)
        .await
        .expect("listing despite cache failure");
    assert_eq!(listing.len(), 1);
}

#[rstest]
#[case(RestaurantRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(RestaurantRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_errors_map_to_domain_codes(
    #[case] failure: RestaurantRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut restaurants = MockRestaurantRepository::new();
    restaurants.expect_list().return_once(move |_| Err(failure));

    let service = make_service(restaurants, MockVisitRepository::new(), cache_miss());
    let error = service
        .list_restaurants(None, SortOption::Latest)
        .await
        .expect_err("store failure");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn get_restaurant_returns_none_when_absent() {
    let mut restaurants = MockRestaurantRepository::new();
    restaurants.expect_find_by_id().return_once(|_| Ok(None));
    let mut cache = MockListingCache::new();
    cache.expect_restaurant().returning(|_| Ok(None));
    cache
        .expect_generation()
        .returning(|| Ok(CacheGeneration::default()));
    cache.expect_store_restaurant().never();

    let service = make_service(restaurants, MockVisitRepository::new(), cache);
    let found = service
        .get_restaurant(&RestaurantId::random())
        .await
        .expect("lookup");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn get_restaurant_returns_restaurants_without_visits(kims_bbq: Restaurant) {
    let mut restaurants = MockRestaurantRepository::new();
    let row = kims_bbq.clone();
    restaurants
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(row)));
    let mut visits = MockVisitRepository::new();
    visits
        .expect_list_summaries_for()
        .return_once(|_| Ok(Vec::new()));

    let service = make_service(restaurants, visits, cache_miss());
    let found = service
        .get_restaurant(&kims_bbq.id)
        .await
        .expect("lookup")
        .expect("restaurant present");
    assert_eq!(found.visit_count, 0);
    assert_eq!(found.average_rating, None);
}

#[rstest]
#[tokio::test]
async fn readonly_callers_cannot_create_restaurants() {
    let mut restaurants = MockRestaurantRepository::new();
    restaurants.expect_insert().never();

    let service = make_service(restaurants, MockVisitRepository::new(), MockListingCache::new());
    let error = service
        .create_restaurant(&caller("guest"), new_restaurant())
        .await
        .expect_err("guest is readonly");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn create_restaurant_stamps_clock_and_invalidates() {
    let mut restaurants = MockRestaurantRepository::new();
    restaurants
        .expect_insert()
        .withf(|restaurant| !restaurant.is_favorite && restaurant.name == "Kim's BBQ")
        .times(1)
        .returning(|_| Ok(()));
    let mut cache = MockListingCache::new();
    cache.expect_invalidate_listings().times(1).returning(|| Ok(()));
    cache
        .expect_invalidate_restaurant()
        .times(1)
        .returning(|_| Ok(()));

    let service = make_service(restaurants, MockVisitRepository::new(), cache);
    let created = service
        .create_restaurant(&caller("minju"), new_restaurant())
        .await
        .expect("created");
    assert_eq!(
        created.created_at,
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    );
    assert!(!created.is_favorite);
}

#[rstest]
#[tokio::test]
async fn toggling_an_absent_restaurant_leaves_the_cache_alone() {
    let mut restaurants = MockRestaurantRepository::new();
    restaurants.expect_toggle_favorite().return_once(|_| Ok(None));
    let mut cache = MockListingCache::new();
    cache.expect_invalidate_listings().never();

    let service = make_service(restaurants, MockVisitRepository::new(), cache);
    let toggled = service
        .toggle_favorite(&caller("chulsoo"), &RestaurantId::random())
        .await
        .expect("toggle");
    assert!(toggled.is_none());
}

#[rstest]
#[tokio::test]
async fn deleting_an_absent_restaurant_is_a_no_op() {
    let mut restaurants = MockRestaurantRepository::new();
    restaurants.expect_delete().return_once(|_| Ok(false));
    let mut cache = MockListingCache::new();
    cache.expect_invalidate_listings().never();

    let service = make_service(restaurants, MockVisitRepository::new(), cache);
    service
        .delete_restaurant(&caller("younghee"), &RestaurantId::random())
        .await
        .expect("no-op delete");
}

#[rstest]
#[tokio::test]
async fn stats_cover_the_unfiltered_listing(kims_bbq: Restaurant) {
    let mut restaurants = MockRestaurantRepository::new();
    let rows = vec![kims_bbq.clone()];
    restaurants
        .expect_list()
        .withf(|category| category.is_none())
        .return_once(move |_| Ok(rows));
    let mut visits = MockVisitRepository::new();
    let id = kims_bbq.id;
    visits.expect_list_summaries_for().return_once(move |_| {
        Ok(vec![
            visit_on(id, "Galbi", Some(45), date(2)),
            visit_on(id, "Bulgogi", Some(35), date(3)),
        ])
    });

    let service = RestaurantService::new(
        Arc::new(restaurants),
        Arc::new(visits),
        Arc::new(NoOpListingCache),
        clock(),
    );
    let stats = service.listing_stats().await.expect("stats");
    assert_eq!(stats.restaurant_count, 1);
    assert_eq!(stats.visit_count, 2);
    assert_eq!(stats.top_rated.len(), 1);
}

/// Visit store that records a second visit, and invalidates the cache the way
/// a visit mutation does, while the first summary load is still in flight.
struct VisitWrittenDuringLoad {
    store: Arc<InMemoryStore>,
    cache: Arc<InMemoryListingCache>,
    pending: Mutex<Option<Visit>>,
}

#[async_trait]
impl VisitRepository for VisitWrittenDuringLoad {
    async fn list_summaries_for(
        &self,
        restaurant_ids: &[RestaurantId],
    ) -> Result<Vec<VisitSummary>, VisitRepositoryError> {
        let summaries = self.store.list_summaries_for(restaurant_ids).await?;
        let pending = self.pending.lock().expect("pending visit lock").take();
        if let Some(visit) = pending {
            VisitRepository::insert(self.store.as_ref(), &visit).await?;
            invalidate_after_mutation(self.cache.as_ref(), &visit.restaurant_id).await;
        }
        Ok(summaries)
    }

    async fn find_by_id(&self, id: &VisitId) -> Result<Option<Visit>, VisitRepositoryError> {
        VisitRepository::find_by_id(self.store.as_ref(), id).await
    }

    async fn insert(&self, visit: &Visit) -> Result<(), VisitRepositoryError> {
        VisitRepository::insert(self.store.as_ref(), visit).await
    }

    async fn update(
        &self,
        id: &VisitId,
        details: &VisitDetails,
        image: &ImageUpdate,
    ) -> Result<Option<VisitSummary>, VisitRepositoryError> {
        VisitRepository::update(self.store.as_ref(), id, details, image).await
    }

    async fn delete(&self, id: &VisitId) -> Result<bool, VisitRepositoryError> {
        VisitRepository::delete(self.store.as_ref(), id).await
    }

    async fn find_image(&self, id: &VisitId) -> Result<Option<Vec<u8>>, VisitRepositoryError> {
        self.store.find_image(id).await
    }
}

type RacingService = RestaurantService<InMemoryStore, VisitWrittenDuringLoad, InMemoryListingCache>;

async fn service_with_a_visit_written_during_load(restaurant: &Restaurant) -> RacingService {
    let store = Arc::new(InMemoryStore::new());
    RestaurantRepository::insert(store.as_ref(), restaurant)
        .await
        .expect("insert restaurant");
    VisitRepository::insert(
        store.as_ref(),
        &stored_visit(restaurant.id, "Galbi", Some(45), date(2)),
    )
    .await
    .expect("insert first visit");

    let cache = Arc::new(InMemoryListingCache::new(CachePolicy::default(), clock()));
    let visits = VisitWrittenDuringLoad {
        store: store.clone(),
        cache: cache.clone(),
        pending: Mutex::new(Some(stored_visit(restaurant.id, "Bulgogi", Some(35), date(3)))),
    };
    RestaurantService::new(store, Arc::new(visits), cache, clock())
}

#[rstest]
#[tokio::test]
async fn listings_loaded_across_a_mutation_are_not_cached(kims_bbq: Restaurant) {
    let service = service_with_a_visit_written_during_load(&kims_bbq).await;

    let during = service
        .list_restaurants(None, SortOption::Latest)
        .await
        .expect("listing during the write");
    assert_eq!(during[0].visit_count, 1);

    let after = service
        .list_restaurants(None, SortOption::Latest)
        .await
        .expect("listing after the write");
    assert_eq!(after[0].visit_count, 2);
}

#[rstest]
#[tokio::test]
async fn restaurants_loaded_across_a_mutation_are_not_cached(kims_bbq: Restaurant) {
    let service = service_with_a_visit_written_during_load(&kims_bbq).await;

    let during = service
        .get_restaurant(&kims_bbq.id)
        .await
        .expect("lookup during the write")
        .expect("restaurant present");
    assert_eq!(during.visit_count, 1);

    let after = service
        .get_restaurant(&kims_bbq.id)
        .await
        .expect("lookup after the write")
        .expect("restaurant present");
    assert_eq!(after.visit_count, 2);
}
