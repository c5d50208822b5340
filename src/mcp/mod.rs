//! Stdio JSON-RPC server module.
//!
//! Exposes the "list endpoints" operation as tools over newline-delimited
//! JSON-RPC 2.0 for editor and agent integrations.

pub mod server;
pub mod tools;
pub mod types;
