//! # Configuration Module
//!
//! Application configuration is loaded once at startup from:
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - Environment variables (prefixed with APP__)
//! - .env files (via dotenvy)
//!
//! ```rust,ignore
//! use messenger_api::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Server will listen on {}", settings.server_addr());
//! ```

mod settings;

pub use settings::*;
