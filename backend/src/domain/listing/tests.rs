//! Tests for listing aggregation and ordering.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::test_support::{restaurant_at, visit_on};

#[fixture]
fn base_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date")
}

fn tenths(values: &[u8]) -> Vec<Rating> {
    values
        .iter()
        .map(|value| Rating::from_tenths(*value).expect("valid rating"))
        .collect()
}

#[rstest]
#[case(&[45], Some(45))]
#[case(&[45, 35], Some(40))]
#[case(&[35, 40], Some(38))]
#[case(&[30, 35, 35], Some(33))]
#[case(&[50, 45, 45], Some(47))]
#[case(&[], None)]
fn average_rounds_half_up(#[case] ratings: &[u8], #[case] expected: Option<u32>) {
    let average = AverageRating::of(tenths(ratings));
    assert_eq!(average.map(AverageRating::tenths), expected);
}

#[rstest]
fn restaurants_without_visits_are_excluded(base_time: chrono::DateTime<Utc>) {
    let visited = restaurant_at("Kim's BBQ", Category::Korean, base_time);
    let empty = restaurant_at("Empty", Category::Chinese, base_time + Duration::hours(1));
    let visits = vec![visit_on(visited.id, "Galbi", Some(45), date(2))];

    let listing = assemble_listing(vec![empty, visited.clone()], visits, SortOption::Latest);

    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id(), visited.id);
    assert_eq!(listing[0].visit_count, 1);
}

#[rstest]
fn kims_bbq_average_tracks_new_visits(base_time: chrono::DateTime<Utc>) {
    let restaurant = restaurant_at("Kim's BBQ", Category::Korean, base_time);
    let first = visit_on(restaurant.id, "Galbi", Some(45), date(2));

    let listing = assemble_listing(vec![restaurant.clone()], vec![first.clone()], SortOption::Latest);
    assert_eq!(listing[0].average_rating.map(AverageRating::value), Some(4.5));
    assert_eq!(listing[0].visit_count, 1);

    let second = visit_on(restaurant.id, "Bulgogi", Some(35), date(3));
    let listing = assemble_listing(vec![restaurant], vec![first, second], SortOption::Latest);
    assert_eq!(listing[0].average_rating.map(AverageRating::value), Some(4.0));
    assert_eq!(listing[0].visit_count, 2);
}

#[rstest]
fn unrated_visits_do_not_count_towards_average(base_time: chrono::DateTime<Utc>) {
    let restaurant = restaurant_at("Noodles", Category::Chinese, base_time);
    let visits = vec![
        visit_on(restaurant.id, "Jjajang", None, date(1)),
        visit_on(restaurant.id, "Jjamppong", Some(40), date(2)),
    ];
    let listing = assemble_listing(vec![restaurant], visits, SortOption::Latest);
    assert_eq!(listing[0].average_rating.map(AverageRating::tenths), Some(40));
    assert_eq!(listing[0].visit_count, 2);

    let unrated = restaurant_at("Unrated", Category::Other, base_time);
    let listing = assemble_listing(
        vec![unrated.clone()],
        vec![visit_on(unrated.id, "Tea", None, date(1))],
        SortOption::Latest,
    );
    assert_eq!(listing[0].average_rating, None);
}

#[rstest]
fn visits_are_ordered_by_date_descending(base_time: chrono::DateTime<Utc>) {
    let restaurant = restaurant_at("Sushi", Category::Japanese, base_time);
    let visits = vec![
        visit_on(restaurant.id, "early", None, date(1)),
        visit_on(restaurant.id, "late", None, date(20)),
        visit_on(restaurant.id, "middle", None, date(10)),
    ];
    let listing = assemble_listing(vec![restaurant], visits, SortOption::Latest);
    let menus: Vec<&str> = listing[0].visits.iter().map(|v| v.menu.as_str()).collect();
    assert_eq!(menus, ["late", "middle", "early"]);
}

#[rstest]
fn latest_sorts_by_creation_descending(base_time: chrono::DateTime<Utc>) {
    let old = restaurant_at("Old", Category::Korean, base_time);
    let new = restaurant_at("New", Category::Korean, base_time + Duration::days(1));
    let visits = vec![
        visit_on(old.id, "a", None, date(1)),
        visit_on(new.id, "b", None, date(1)),
    ];
    let listing = assemble_listing(vec![old, new], visits, SortOption::Latest);
    let names: Vec<&str> = listing.iter().map(|r| r.restaurant.name.as_str()).collect();
    assert_eq!(names, ["New", "Old"]);
}

#[rstest]
fn name_sorts_ascending(base_time: chrono::DateTime<Utc>) {
    let b = restaurant_at("Bistro", Category::Western, base_time);
    let a = restaurant_at("Alley", Category::Snack, base_time);
    let visits = vec![
        visit_on(b.id, "steak", None, date(1)),
        visit_on(a.id, "tteokbokki", None, date(1)),
    ];
    let listing = assemble_listing(vec![b, a], visits, SortOption::Name);
    let names: Vec<&str> = listing.iter().map(|r| r.restaurant.name.as_str()).collect();
    assert_eq!(names, ["Alley", "Bistro"]);
}

#[rstest]
fn rating_sort_places_unrated_last_and_is_stable(base_time: chrono::DateTime<Utc>) {
    let unrated_first = restaurant_at("Unrated A", Category::Korean, base_time + Duration::hours(4));
    let good = restaurant_at("Good", Category::Korean, base_time + Duration::hours(3));
    let unrated_second = restaurant_at("Unrated B", Category::Korean, base_time + Duration::hours(2));
    let tie_first = restaurant_at("Tie A", Category::Korean, base_time + Duration::hours(1));
    let tie_second = restaurant_at("Tie B", Category::Korean, base_time);
    let visits = vec![
        visit_on(unrated_first.id, "x", None, date(1)),
        visit_on(good.id, "x", Some(50), date(1)),
        visit_on(unrated_second.id, "x", None, date(1)),
        visit_on(tie_first.id, "x", Some(30), date(1)),
        visit_on(tie_second.id, "x", Some(30), date(1)),
    ];

    let listing = assemble_listing(
        vec![unrated_first, good, unrated_second, tie_first, tie_second],
        visits,
        SortOption::Rating,
    );

    let names: Vec<&str> = listing.iter().map(|r| r.restaurant.name.as_str()).collect();
    assert_eq!(names, ["Good", "Tie A", "Tie B", "Unrated A", "Unrated B"]);
}

#[rstest]
#[case("latest", Ok(SortOption::Latest))]
#[case("rating", Ok(SortOption::Rating))]
#[case("name", Ok(SortOption::Name))]
#[case("price", Err(UnknownSortOption("price".to_owned())))]
fn parses_sort_options(#[case] raw: &str, #[case] expected: Result<SortOption, UnknownSortOption>) {
    assert_eq!(raw.parse::<SortOption>(), expected);
}

#[rstest]
fn listing_serialises_flat_camel_case(base_time: chrono::DateTime<Utc>) {
    let restaurant = restaurant_at("Kim's BBQ", Category::Korean, base_time);
    let listing = assemble_listing(
        vec![restaurant.clone()],
        vec![visit_on(restaurant.id, "Galbi", Some(45), date(2))],
        SortOption::Latest,
    );
    let json = serde_json::to_value(&listing[0]).expect("serialise listing entry");
    assert_eq!(json["name"], "Kim's BBQ");
    assert_eq!(json["category"], "한식");
    assert_eq!(json["isFavorite"], false);
    assert_eq!(json["averageRating"], 4.5);
    assert_eq!(json["visitCount"], 1);
    assert_eq!(json["visits"][0]["menu"], "Galbi");
}
