use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const REQUEST_TIMEOUT_SECS: u64 = 10;
// Grounded generations routinely take tens of seconds.
const CHAT_TIMEOUT_SECS: u64 = 120;
const USER_AGENT: &str = concat!("betmaster-terminal/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();
static CHAT_CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build_client(REQUEST_TIMEOUT_SECS))
}

pub fn chat_http_client() -> Result<&'static Client> {
    CHAT_CLIENT.get_or_try_init(|| build_client(CHAT_TIMEOUT_SECS))
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build http client")
}
