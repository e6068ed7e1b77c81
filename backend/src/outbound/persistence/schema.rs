//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Registered restaurants. `category` holds the Korean label.
    restaurants (id) {
        id -> Uuid,
        name -> Text,
        address -> Text,
        latitude -> Float8,
        longitude -> Float8,
        category -> Text,
        is_favorite -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Visits; rows are removed with their restaurant (`ON DELETE CASCADE`).
    visits (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        user_id -> Nullable<Text>,
        menu -> Text,
        rating -> Nullable<Numeric>,
        price -> Nullable<Text>,
        comment -> Nullable<Text>,
        image -> Nullable<Bytea>,
        visited_at -> Date,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(visits -> restaurants (restaurant_id));
diesel::allow_tables_to_appear_in_same_query!(restaurants, visits);
