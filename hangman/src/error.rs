use std::{io, path::PathBuf};

use crate::lifecycle::GameState;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("word list {} is unavailable: {reason}", path.display())]
    DictionaryUnavailable { path: PathBuf, reason: String },
    #[error("save file is malformed: {0}")]
    MalformedSaveFile(String),
    #[error("unable to encode game: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("target words must consist of ASCII letters - {0:?} is not valid")]
    InvalidWord(String),
    #[error("no hint is available for this game")]
    NoHintAvailable,
    #[error("guesses must consist of a single ASCII letter - {0:?} is not valid")]
    IllegalGuess(char),
    #[error("cannot {action} while the game is {state}")]
    IllegalAction {
        action: &'static str,
        state: GameState,
    },
    #[error("unable to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn dictionary(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::DictionaryUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
