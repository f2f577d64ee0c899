use geotrawl_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("could not render {host} over https or http")]
    RenderError { host: String },

    #[error(transparent)]
    ScanError(#[from] ScanError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("Could not replace record store: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
