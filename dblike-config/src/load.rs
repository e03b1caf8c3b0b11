use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::shared::{SchemaConfig, ValidationError};

/// File stem of the schema configuration file.
const SCHEMA_FILE_STEM: &str = "schema";

/// Supported extensions for the schema configuration file.
const CONFIG_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Prefix for environment variable configuration overrides.
const ENV_PREFIX: &str = "DBLIKE";

/// Separator between environment variable prefix and key segments.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested configuration keys in environment variables.
const ENV_SEPARATOR: &str = "__";

/// Errors that can occur while loading a schema configuration.
#[derive(Debug, Error)]
pub enum LoadConfigError {
    /// The configuration directory does not exist.
    #[error("configuration directory `{0}` does not exist")]
    MissingConfigurationDirectory(PathBuf),

    /// No schema file with a supported extension was found.
    #[error("could not locate a schema file in `{directory}`; attempted: {attempted}")]
    ConfigurationFileMissing { directory: PathBuf, attempted: String },

    /// The file extension is not one of the supported formats.
    #[error("unsupported schema file `{0}`; expected one of yaml, yml, json")]
    UnsupportedFormat(PathBuf),

    /// A schema file existed but could not be read or parsed.
    #[error("failed to load schema from `{path}`: {source}")]
    ConfigurationFileLoad {
        path: PathBuf,
        source: config::ConfigError,
    },

    /// The file was parsed but deserialization failed.
    #[error("failed to deserialize schema: {0}")]
    Deserialization(#[source] config::ConfigError),

    /// The schema was deserialized but is not valid.
    #[error("invalid schema: {0}")]
    Validation(#[from] ValidationError),

    /// Failed to inspect the configuration directory.
    #[error("failed to inspect configuration directory: {0}")]
    Io(#[from] io::Error),
}

/// Loads and validates the schema from `directory/schema.(yaml|yml|json)`.
///
/// Values may be overridden with `DBLIKE_`-prefixed environment variables, using double
/// underscores for nested keys.
pub fn load_schema_config(directory: impl AsRef<Path>) -> Result<SchemaConfig, LoadConfigError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(LoadConfigError::MissingConfigurationDirectory(
            directory.to_path_buf(),
        ));
    }

    let path = find_schema_file(directory)?;
    load(&path, true)
}

/// Loads and validates the schema from a single file, without environment overrides.
///
/// The format is picked from the file extension.
pub fn load_schema_config_from_file(
    path: impl AsRef<Path>,
) -> Result<SchemaConfig, LoadConfigError> {
    let path = path.as_ref();
    let supported = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| CONFIG_FILE_EXTENSIONS.contains(&extension));
    if !supported {
        return Err(LoadConfigError::UnsupportedFormat(path.to_path_buf()));
    }

    load(path, false)
}

fn load(path: &Path, with_environment: bool) -> Result<SchemaConfig, LoadConfigError> {
    let mut builder = config::Config::builder().add_source(config::File::from(path));
    if with_environment {
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_PREFIX_SEPARATOR)
                .separator(ENV_SEPARATOR),
        );
    }

    let settings = builder
        .build()
        .map_err(|source| LoadConfigError::ConfigurationFileLoad {
            path: path.to_path_buf(),
            source,
        })?;

    let schema = settings
        .try_deserialize::<SchemaConfig>()
        .map_err(LoadConfigError::Deserialization)?;
    schema.validate()?;

    Ok(schema)
}

/// Finds the schema file with the first supported extension.
fn find_schema_file(directory: &Path) -> Result<PathBuf, LoadConfigError> {
    let mut attempted_paths = Vec::with_capacity(CONFIG_FILE_EXTENSIONS.len());

    for extension in CONFIG_FILE_EXTENSIONS {
        let path = directory.join(format!("{SCHEMA_FILE_STEM}.{extension}"));
        attempted_paths.push(path.clone());

        if path.is_file() {
            return Ok(path);
        }
    }

    let attempted = attempted_paths
        .iter()
        .map(|path| format!("`{}`", path.display()))
        .collect::<Vec<_>>()
        .join(", ");

    Err(LoadConfigError::ConfigurationFileMissing {
        directory: directory.to_path_buf(),
        attempted,
    })
}
