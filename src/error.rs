// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for graph operations

use thiserror::Error;

/// Errors raised by the graph model
#[derive(Debug, Error)]
pub enum GraphError {
    /// One or both edge endpoints are not in the graph
    #[error("invalid edge endpoint: {from} -> {to}")]
    InvalidEdgeEndpoint {
        /// Requested source id
        from: String,
        /// Requested target id
        to: String,
    },

    /// The referenced vertex is not in the graph
    #[error("vertex not found: {0}")]
    VertexNotFound(String),

    /// A snapshot could not be encoded or decoded
    #[error("invalid graph snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn endpoint(from: &str, to: &str) -> Self {
        Self::InvalidEdgeEndpoint {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
