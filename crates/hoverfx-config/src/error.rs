use std::path::{Path, PathBuf};

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attach the offending file to a parse or validation error.
    pub fn at(self, path: &Path) -> Self {
        match self {
            err @ (ConfigError::Parse(_) | ConfigError::Invalid(_)) => ConfigError::InFile {
                path: path.to_path_buf(),
                source: Box::new(err),
            },
            other => other,
        }
    }
}
