//! Place search adapter for the Naver local search API.

mod dto;
mod http_source;

pub use http_source::{NAVER_LOCAL_SEARCH_URL, NaverCredentials, NaverPlaceSearch};
