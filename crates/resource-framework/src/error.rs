//! # Framework Errors
//!
//! This module defines the common error types used throughout the resource framework.
//! By centralizing error definitions, we ensure consistent error handling across
//! all tables, repositories and HTTP resources.
//!
//! Storage errors never carry HTTP semantics themselves; the [`http`](crate::http)
//! layer decides which status a given variant maps to.

/// Errors raised by table actors, their clients and repositories.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameworkError {
    /// The table actor has stopped and no longer accepts requests.
    #[error("Table actor closed")]
    ActorClosed,
    /// The table actor dropped the reply channel before answering.
    #[error("Table actor dropped response channel")]
    ActorDropped,
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
    /// A relation of the record being written names a row that does not exist.
    #[error("Referenced {entity} not found: {id}")]
    MissingReference { entity: &'static str, id: i64 },
    #[error("Unknown relation '{relation}' on {entity}")]
    UnknownRelation {
        entity: &'static str,
        relation: String,
    },
}

impl FrameworkError {
    /// Shorthand for [`FrameworkError::NotFound`].
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn missing_reference(entity: &'static str, id: i64) -> Self {
        Self::MissingReference { entity, id }
    }

    /// True when the error only says the row is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
