// Typed failure taxonomy for the collection pipeline.
// Each kind maps to one catch-log-continue boundary: TransientFetch is skipped
// per metric cell, MissingAttribute and StructuralResponse skip the instance.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    /// A monitoring or inventory call failed; the unit of work it was serving
    /// is skipped and the run continues.
    #[error("{operation} failed for {resource_id}: {message}")]
    TransientFetch {
        resource_id: String,
        operation: &'static str,
        message: String,
    },

    /// The service response omitted a field the report requires.
    #[error("missing attribute `{field}` for {resource_id}")]
    MissingAttribute {
        resource_id: String,
        field: &'static str,
    },

    /// The response arrived but did not have the expected shape.
    #[error("unexpected {operation} response for {resource_id}: {message}")]
    StructuralResponse {
        resource_id: String,
        operation: &'static str,
        message: String,
    },
}

impl CollectError {
    pub fn transient(
        resource_id: impl Into<String>,
        operation: &'static str,
        err: impl fmt::Display,
    ) -> Self {
        CollectError::TransientFetch {
            resource_id: resource_id.into(),
            operation,
            message: err.to_string(),
        }
    }

    pub fn missing(resource_id: impl Into<String>, field: &'static str) -> Self {
        CollectError::MissingAttribute {
            resource_id: resource_id.into(),
            field,
        }
    }

    pub fn structural(
        resource_id: impl Into<String>,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        CollectError::StructuralResponse {
            resource_id: resource_id.into(),
            operation,
            message: message.into(),
        }
    }
}
