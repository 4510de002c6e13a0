use std::path::PathBuf;

use reqwest::{StatusCode, Url};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllowlistError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request to {url} returned {status}")]
    Status { url: Url, status: StatusCode },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AllowlistError {
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| AllowlistError::Io { path, source }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AllowlistError::Network(_) | AllowlistError::Status { .. } => "network",
            AllowlistError::Parse(_) => "parse",
            AllowlistError::Io { .. } => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, AllowlistError>;
