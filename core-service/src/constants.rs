//! Central Configuration Constants
//!
//! Single source of truth for deployment defaults shared by the trainer
//! and the HTTP server.

/// Directory the trainer writes artifacts to and the server loads from
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5003;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Streetlight Energy Optimizer";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model directory from environment or use default
pub fn get_model_dir() -> String {
    std::env::var("MODEL_DIR")
        .unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string())
}

/// Get HTTP port from environment or use default
pub fn get_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Get bind address from environment or use default
pub fn get_host() -> String {
    std::env::var("HOST")
        .unwrap_or_else(|_| DEFAULT_HOST.to_string())
}
