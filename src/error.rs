use crate::models::TodoId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("invalid todo shape: {0}")]
    InvalidShape(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown format `{0}` (expected json or toml)")]
    UnknownFormat(String),

    #[error("no todo with id {0}")]
    NotFound(TodoId),

    #[error("id {0} is already taken")]
    IdTaken(TodoId),

    #[error("id space exhausted")]
    IdsExhausted,

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
