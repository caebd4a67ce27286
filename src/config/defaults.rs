//! Default values for configuration
//!
//! Each default consults the matching `ONLYSAIDKB_*` environment variable
//! first, so the server can run entirely from the environment without a
//! config file.

/// Default OnlysaidKB API base URL
pub fn default_base_url() -> String {
    std::env::var("ONLYSAIDKB_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000/api/kb".to_string())
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    std::env::var("ONLYSAIDKB_TIMEOUT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30)
}

/// Default model used for answer generation
pub fn default_model() -> String {
    std::env::var("ONLYSAIDKB_DEFAULT_MODEL").unwrap_or_else(|_| "gpt-4".to_string())
}

/// Default number of documents to retrieve
pub fn default_top_k() -> u32 {
    std::env::var("ONLYSAIDKB_DEFAULT_TOP_K")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5)
}

/// Default response language code
pub fn default_language() -> String {
    std::env::var("ONLYSAIDKB_DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".to_string())
}
