use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("build error: {0}")]
    Build(#[from] crate::build::BuildError),
    #[error("package error: {0}")]
    Package(#[from] crate::package::PackageError),
    #[error("{0}")]
    Serve(#[from] crate::server::ServeError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Port conflicts are reported to the user but are not a failed run.
    pub fn is_port_in_use(&self) -> bool {
        matches!(
            self,
            AppError::Serve(crate::server::ServeError::PortInUse { .. })
        )
    }
}
