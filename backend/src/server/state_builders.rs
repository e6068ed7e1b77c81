//! Builders for the HTTP state: repository selection, services and the
//! place search adapter.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use lunchlog::domain::ports::{
    DisabledPlaceSearch, PlaceSearch, PlacesQuery, RestaurantRepository, VisitRepository,
};
use lunchlog::domain::{PlaceSearchService, RestaurantService, VisitService};
use lunchlog::inbound::http::state::{HttpState, HttpStatePorts};
use lunchlog::outbound::cache::{CachePolicy, InMemoryListingCache};
use lunchlog::outbound::memory::InMemoryStore;
use lunchlog::outbound::persistence::{DieselRestaurantRepository, DieselVisitRepository};
use lunchlog::outbound::places::NaverPlaceSearch;

use super::ServerConfig;

/// Wire restaurant and visit services over one pair of repositories.
///
/// Both services share the listing cache so that visit mutations
/// invalidate the listings the restaurant service serves.
fn build_domain_ports<R, V>(
    restaurants: Arc<R>,
    visits: Arc<V>,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
    places: Arc<dyn PlacesQuery>,
) -> HttpStatePorts
where
    R: RestaurantRepository + 'static,
    V: VisitRepository + 'static,
{
    let cache = Arc::new(InMemoryListingCache::new(policy, clock.clone()));
    let restaurant_service = Arc::new(RestaurantService::new(
        restaurants.clone(),
        visits.clone(),
        cache.clone(),
        clock.clone(),
    ));
    let visit_service = Arc::new(VisitService::new(restaurants, visits, cache, clock));

    HttpStatePorts {
        restaurants: restaurant_service.clone(),
        restaurant_commands: restaurant_service,
        visits: visit_service.clone(),
        visit_images: visit_service,
        places,
    }
}

/// Use the database-backed repositories when a pool is available,
/// otherwise a shared in-memory store.
fn build_ports_with_pool<Pool, R, V>(
    pool: Option<&Pool>,
    make_repositories: impl FnOnce(&Pool) -> (Arc<R>, Arc<V>),
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
    places: Arc<dyn PlacesQuery>,
) -> HttpStatePorts
where
    R: RestaurantRepository + 'static,
    V: VisitRepository + 'static,
{
    match pool {
        Some(pool) => {
            let (restaurants, visits) = make_repositories(pool);
            build_domain_ports(restaurants, visits, policy, clock, places)
        }
        None => {
            info!("no database configured; restaurants and visits are kept in memory");
            let store = Arc::new(InMemoryStore::new());
            build_domain_ports(store.clone(), store, policy, clock, places)
        }
    }
}

fn place_search_query<S>(search: S) -> Arc<dyn PlacesQuery>
where
    S: PlaceSearch + 'static,
{
    Arc::new(PlaceSearchService::new(Arc::new(search)))
}

/// Place search backed by Naver when configured; otherwise every search
/// reports the provider as unavailable.
fn build_places(search: Option<NaverPlaceSearch>) -> Arc<dyn PlacesQuery> {
    match search {
        Some(search) => place_search_query(search),
        None => {
            info!("place search credentials absent; /api/v1/places is disabled");
            place_search_query(DisabledPlaceSearch)
        }
    }
}

/// Build the shared HTTP state from the server configuration.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let places = build_places(config.place_search.clone());
    let ports = build_ports_with_pool(
        config.db_pool.as_ref(),
        |pool| {
            (
                Arc::new(DieselRestaurantRepository::new(pool.clone())),
                Arc::new(DieselVisitRepository::new(pool.clone())),
            )
        },
        config.cache_policy,
        Arc::new(DefaultClock),
        places,
    );
    web::Data::new(HttpState::new(ports))
}
