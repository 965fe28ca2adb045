use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to decode artwork: {0}")]
    ArtworkDecode(String),

    #[error("Artwork upload failed: {0}")]
    UploadFailed(String),

    #[error("Upload endpoint returned status {status}: {body}")]
    UploadStatus { status: u16, body: String },

    #[error("Upload endpoint returned an empty URL")]
    EmptyUploadResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
