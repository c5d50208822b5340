//! Endpoint manifest: descriptor types, metadata extraction, CRUD/SQL
//! classification, and the builder that ties them to the folder scan.

pub mod builder;
pub mod crud;
pub mod metadata;
pub mod types;

pub use builder::{describe, describe_file, list_endpoints, list_endpoints_blocking, list_endpoints_with};
pub use crud::{classify, detect, Classification, Pattern};
pub use metadata::{extract, Metadata};
pub use types::{EndpointDescriptor, EndpointKind, Field, Verb};
