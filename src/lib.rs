// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod draft;
pub mod export;
pub mod protocol;
pub mod ws_server;
