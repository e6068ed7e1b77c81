//! Shared cache-control policies for HTTP handlers.

/// Private responses must always be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Visit images never change under a given URL.
pub const PUBLIC_IMMUTABLE_YEAR: &str = "public, max-age=31536000, immutable";

/// Header tuple for private API responses such as listings.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE_MUST_REVALIDATE)
}

/// Header tuple for immutable binary responses.
pub const fn public_immutable_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_IMMUTABLE_YEAR)
}
