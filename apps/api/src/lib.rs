//! Resume builder core: section controllers kept in sync with a shared
//! document, per-section persistence through a record store, and a
//! table-driven layout renderer for the preview and share views.

pub mod codec;
pub mod config;
pub mod dates;
pub mod db;
pub mod document;
pub mod errors;
pub mod layout;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod sections;
pub mod session;
pub mod state;
pub mod store;
pub mod wizard;

#[cfg(test)]
pub(crate) mod test_support;
