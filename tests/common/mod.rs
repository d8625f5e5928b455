//! Common test infrastructure
//!
//! This module provides the infrastructure shared by the end-to-end tests.
//! Tests should only import from this module, not from internal submodules.

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use server::TestServer;

// Keep fixtures internal - only accessed via TestServer::spawn()
#[allow(unused_imports)]
pub(crate) use fixtures::{create_empty_data_dir, create_test_data_dir};
