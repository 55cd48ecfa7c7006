//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ShipperConfig (validated, immutable)
//!     → sections handed to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ChannelConfig;
pub use schema::CollectorConfig;
pub use schema::DurationUnit;
pub use schema::ObservabilityConfig;
pub use schema::ProxyProcessConfig;
pub use schema::ShipperConfig;
pub use schema::SpanConfig;
pub use validation::override_log_level;
