//! Driving port for streaming stored visit images.

use async_trait::async_trait;

use crate::domain::{Error, VisitId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitImageQuery: Send + Sync {
    /// Raw image bytes; `None` when the visit or its image is absent.
    async fn visit_image(&self, id: &VisitId) -> Result<Option<Vec<u8>>, Error>;
}

/// Fixture query with no images.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVisitImageQuery;

#[async_trait]
impl VisitImageQuery for FixtureVisitImageQuery {
    async fn visit_image(&self, _id: &VisitId) -> Result<Option<Vec<u8>>, Error> {
        Ok(None)
    }
}
