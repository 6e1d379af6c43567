//! Support for library configuration options

use std::error::Error;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use url::Url;

/// Where the task server is expected to listen, unless told otherwise
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Environment variable that overrides [`DEFAULT_API_BASE_URL`]
pub const API_BASE_URL_ENV_VAR: &str = "TASKBOARD_API_URL";

/// Base URL of the task server API (e.g. `http://localhost:3000/api`).
/// It is read from `TASKBOARD_API_URL` at first use. Feel free to override it when initing this library.
pub static API_BASE_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| {
    let url = std::env::var(API_BASE_URL_ENV_VAR)
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    Arc::new(Mutex::new(url))
});

/// Parse the currently configured [`API_BASE_URL`]
pub fn api_base_url() -> Result<Url, Box<dyn Error>> {
    let raw = match API_BASE_URL.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };
    let url = Url::parse(&raw)
        .map_err(|err| format!("Invalid API base URL {:?}: {}", raw, err))?;
    Ok(url)
}
