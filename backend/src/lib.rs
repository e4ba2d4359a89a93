// Entry point for the `jlearn_backend` library. The binary and the
// integration tests both build the server from these modules.
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod resources;
pub mod store;
pub mod web_server;
