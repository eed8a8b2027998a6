use thiserror::Error;

#[derive(Debug, Error)]
pub enum TileAtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("No tiles to process")]
    Empty,
}

pub type Result<T> = std::result::Result<T, TileAtlasError>;
