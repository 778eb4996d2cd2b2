pub mod chat_client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod football_api;
pub mod http_client;
pub mod key_store;
pub mod logging;
pub mod prompt;
pub mod provider;
pub mod state;
