use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid request location: {0}")]
    InvalidLocation(String),

    #[error("Malformed response body: {0}")]
    Body(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Playback was rejected: {0}")]
    Rejected(String),

    #[error("No media source assigned")]
    NoSource,

    #[error("Media element error: {0}")]
    Media(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage serialization error: {0}")]
    Serialization(String),

    #[error("Storage quota exceeded for key {0}")]
    Quota(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("Template {0} could not be loaded")]
    TemplateUnavailable(String),

    #[error("Template {location} has no {selector} mount node")]
    MissingMountNode { location: String, selector: String },

    #[error("Document has no region {0}")]
    MissingRegion(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Track payload has no id")]
    MissingId,

    #[error("Track {0} has no playable audio location")]
    MissingAudio(String),

    #[error("Track payload is malformed: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("No data directory could be determined")]
    NoDataDir,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}
