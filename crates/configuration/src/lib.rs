use crate::error::ConfigError;
use config::{Environment, File, FileFormat, FileSourceFile};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{ForecastSettings, LogFormat, LoggingSettings, ServerSettings, Settings};
pub use telemetry::init_tracing;

/// The file `load_settings` looks for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `MARGIN__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "MARGIN";

/// Loads the application settings.
///
/// Reads `config.toml` from the working directory if it exists, then applies
/// `MARGIN__SECTION__KEY` environment variables on top. Anything left unset falls back
/// to the defaults in [`Settings`].
pub fn load_settings() -> Result<Settings, ConfigError> {
    build_settings(
        File::with_name(DEFAULT_CONFIG_FILE).required(false),
        environment(),
    )
}

/// Loads settings from an explicit file, which must exist. Environment overrides still apply.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    build_settings(File::from(path).required(true), environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn build_settings(
    file: File<FileSourceFile, FileFormat>,
    environment: Environment,
) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
