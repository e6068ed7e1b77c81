//! Behaviour shared by the fixture driving ports.

use super::*;
use crate::domain::{
    Category, ErrorCode, NewRestaurant, NewRestaurantDraft, RestaurantId, SortOption, UserId,
    VisitDetails, VisitDetailsDraft, VisitId,
};
use crate::test_support::caller;
use chrono::NaiveDate;
use rstest::{fixture, rstest};

#[fixture]
fn new_restaurant() -> NewRestaurant {
    NewRestaurant::new(NewRestaurantDraft {
        name: "Kim's BBQ".to_owned(),
        address: "Gangnam-daero 1, Seoul".to_owned(),
        latitude: 37.4979,
        longitude: 127.0276,
        category: Category::Korean,
    })
    .expect("valid restaurant")
}

#[fixture]
fn details() -> VisitDetails {
    VisitDetails::new(VisitDetailsDraft {
        menu: "Galbi".to_owned(),
        rating: None,
        price: None,
        comment: None,
        visited_at: NaiveDate::from_ymd_opt(2024, 3, 4).expect("date"),
    })
    .expect("valid details")
}

#[rstest]
#[tokio::test]
async fn fixture_commands_reject_the_guest(new_restaurant: NewRestaurant, details: VisitDetails) {
    let guest = caller("guest");

    let restaurant = FixtureRestaurantCommand
        .create_restaurant(&guest, new_restaurant)
        .await
        .expect_err("guest is readonly");
    assert_eq!(restaurant.code(), ErrorCode::Forbidden);

    let visit = FixtureVisitCommand
        .create_visit(
            &guest,
            CreateVisitRequest {
                restaurant_id: RestaurantId::random(),
                details,
                image: None,
            },
        )
        .await
        .expect_err("guest is readonly");
    assert_eq!(visit.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn fixture_visit_command_stamps_the_author(details: VisitDetails) {
    let summary = FixtureVisitCommand
        .create_visit(
            &caller("younghee"),
            CreateVisitRequest {
                restaurant_id: RestaurantId::random(),
                details,
                image: Some(vec![0xFF, 0xD8]),
            },
        )
        .await
        .expect("writer may create");
    assert_eq!(summary.user_id, Some(UserId::new("younghee").expect("registry id")));
    assert!(summary.has_image);
}

#[rstest]
#[tokio::test]
async fn fixture_queries_hold_nothing() {
    let listing = FixtureRestaurantQuery
        .list_restaurants(None, SortOption::Latest)
        .await
        .expect("listing");
    assert!(listing.is_empty());
    let stats = FixtureRestaurantQuery.listing_stats().await.expect("stats");
    assert_eq!(stats.restaurant_count, 0);
    let image = FixtureVisitImageQuery
        .visit_image(&VisitId::random())
        .await
        .expect("image lookup");
    assert!(image.is_none());
}
