use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Image too large: {size} bytes (limit {limit})")]
    ImageTooLarge { size: usize, limit: usize },

    #[error("Tab set is empty")]
    EmptyTabSet,

    #[error("Duplicate tab key: {0}")]
    DuplicateTab(String),

    #[error("Unknown tab key: {0}")]
    UnknownTab(String),

    #[error("Tab row was torn down before measuring: {0}")]
    MeasurementAbandoned(String),

    #[error("Tab measurement timed out, missing: {}", .0.join(", "))]
    MeasurementTimeout(Vec<String>),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
