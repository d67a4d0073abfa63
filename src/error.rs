use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Reading the markup failed. Nothing was cleaned.
    #[error("failed to read markup: {0}")]
    Parse(#[source] io::Error),
    #[error("failed to serialize markup: {0}")]
    Serialize(#[source] io::Error),
    #[error("serialized markup is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}
