//! Remote document store collaborator.
//!
//! [`RemoteStore`] is the narrow async interface the gateways speak to the
//! external persistence provider: an owner-scoped equality query plus create,
//! partial update, and delete. Implementations live in sibling modules
//! ([`crate::memory`] bundles the in-memory one); binding a hosted provider
//! SDK is a drop-in at this seam.

use serde_json::{Map, Value};
use thiserror::Error;

/// A raw record as returned by the document store, before entity mapping.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Store-assigned identifier.
    pub id: String,
    pub fields: Map<String, Value>,
}

/// Failure of a remote call. Gateways log these and reconcile; they are never
/// surfaced to views as typed errors.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RemoteError {
    #[error("remote store unavailable")]
    Unavailable,
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Backend(String),
}

/// Async interface to the external document store.
pub trait RemoteStore {
    /// Query a collection for all records whose `userId` equals `owner_id`.
    fn query_owned(
        &self,
        collection: &str,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Record>, RemoteError>>;

    /// Create a record and return its store-assigned id.
    fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> impl std::future::Future<Output = Result<String, RemoteError>>;

    /// Apply a partial field update to an existing record.
    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>>;

    /// Delete a record by id. Deleting a missing record is not an error.
    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>>;
}
