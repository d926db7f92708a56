/// TOML configuration (`medhub.toml`) and validation.
pub mod toml_config;
/// Logging initialisation.
pub mod telemetry;
