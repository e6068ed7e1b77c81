//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::UserRegistry;
use crate::domain::ports::{
    PlacesQuery, RestaurantCommand, RestaurantQuery, VisitCommand, VisitImageQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub restaurants: Arc<dyn RestaurantQuery>,
    pub restaurant_commands: Arc<dyn RestaurantCommand>,
    pub visits: Arc<dyn VisitCommand>,
    pub visit_images: Arc<dyn VisitImageQuery>,
    pub places: Arc<dyn PlacesQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub restaurants: Arc<dyn RestaurantQuery>,
    pub restaurant_commands: Arc<dyn RestaurantCommand>,
    pub visits: Arc<dyn VisitCommand>,
    pub visit_images: Arc<dyn VisitImageQuery>,
    pub places: Arc<dyn PlacesQuery>,
    pub users: UserRegistry,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use lunchlog::domain::PlaceSearchService;
    /// use lunchlog::domain::ports::{
    ///     DisabledPlaceSearch, FixtureRestaurantCommand, FixtureRestaurantQuery,
    ///     FixtureVisitCommand, FixtureVisitImageQuery,
    /// };
    /// use lunchlog::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     restaurants: Arc::new(FixtureRestaurantQuery),
    ///     restaurant_commands: Arc::new(FixtureRestaurantCommand),
    ///     visits: Arc::new(FixtureVisitCommand),
    ///     visit_images: Arc::new(FixtureVisitImageQuery),
    ///     places: Arc::new(PlaceSearchService::new(Arc::new(DisabledPlaceSearch))),
    /// });
    /// assert_eq!(state.users.all().len(), 4);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            restaurants,
            restaurant_commands,
            visits,
            visit_images,
            places,
        } = ports;
        Self {
            restaurants,
            restaurant_commands,
            visits,
            visit_images,
            places,
            users: UserRegistry,
        }
    }
}
