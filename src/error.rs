//! Error types for loading, rendering and exporting trajectories.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a rendering run.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot read {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid trajectory data: {0}")]
    DataFormat(String),

    #[error("trajectory contains no records")]
    EmptyDataset,

    #[error("export failed: {0}")]
    Export(String),

    #[error("display error: {0}")]
    Display(String),

    #[error("invalid settings: {0}")]
    Config(String),
}

impl RenderError {
    pub(crate) fn export(err: impl std::fmt::Display) -> Self {
        RenderError::Export(err.to_string())
    }

    pub(crate) fn display(err: impl std::fmt::Display) -> Self {
        RenderError::Display(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
