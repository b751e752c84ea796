/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::dic::build::error::DicBuildError;

pub type PocketResult<T> = Result<T, PocketError>;

/// Decoding failures of the binary dictionary.
///
/// Offsets are byte positions in the whole dictionary buffer.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub enum TrieError {
    #[error("unexpected end of data at offset {0}")]
    UnexpectedEof(usize),

    #[error("invalid length header: declared {declared} bytes, found {actual}")]
    InvalidLengthHeader { declared: usize, actual: usize },

    #[error("sibling offset at {0} is too long")]
    OffsetTooLong(usize),

    #[error("invalid character at offset {0}")]
    InvalidCharacter(usize),

    #[error("path starting at {0} has no terminator")]
    UnterminatedPath(usize),
}

/// Pocket dictionary error
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PocketError {
    #[error("{context}: {cause}")]
    ErrWithContext {
        context: String,
        cause: Box<PocketError>,
    },

    #[error("{context}: {cause}")]
    Io {
        cause: std::io::Error,
        context: String,
    },

    #[error("Dictionary {path:?} is unavailable: {cause}")]
    DictionaryUnavailable {
        path: PathBuf,
        cause: std::io::Error,
    },

    #[error("Corrupt dictionary: {0}")]
    CorruptDictionary(#[from] TrieError),

    #[error("Error from nom {0}")]
    NomParseError(String),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config Error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Invalid part of speech: {0}")]
    InvalidPartOfSpeech(String),

    #[error("Article {0} was not found")]
    ArticleNotFound(u16),

    #[error("Invalid data format: {1:?} does not fit in {0} bytes")]
    InvalidDataFormat(usize, String),

    #[error(transparent)]
    DictionaryCompilationError(#[from] DicBuildError),
}

impl From<std::io::Error> for PocketError {
    fn from(e: std::io::Error) -> Self {
        PocketError::Io {
            cause: e,
            context: String::from("IO Error"),
        }
    }
}

impl From<std::fmt::Error> for PocketError {
    fn from(_: std::fmt::Error) -> Self {
        PocketError::Io {
            cause: std::io::Error::new(std::io::ErrorKind::Other, "formatter error"),
            context: String::from("Write Error"),
        }
    }
}

impl PocketError {
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        match self {
            PocketError::Io { cause, .. } => PocketError::Io {
                cause,
                context: ctx.into(),
            },
            cause => PocketError::ErrWithContext {
                cause: Box::new(cause),
                context: ctx.into(),
            },
        }
    }

    /// Returns the decoding failure if this error, or the error it wraps, is one
    pub fn corruption(&self) -> Option<TrieError> {
        match self {
            PocketError::CorruptDictionary(e) => Some(*e),
            PocketError::ErrWithContext { cause, .. } => cause.corruption(),
            _ => None,
        }
    }
}

pub type PocketNomResult<I, O> = nom::IResult<I, O, PocketNomError<I>>;

/// Custom nom error
#[derive(Debug, PartialEq)]
pub enum PocketNomError<I> {
    /// Failed to parse utf8 string
    Utf8String,
    Nom(I, nom::error::ErrorKind),
}

impl<I> nom::error::ParseError<I> for PocketNomError<I> {
    fn from_error_kind(input: I, kind: nom::error::ErrorKind) -> Self {
        PocketNomError::Nom(input, kind)
    }
    fn append(_: I, _: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I: Debug> From<nom::Err<PocketNomError<I>>> for PocketError {
    fn from(err: nom::Err<PocketNomError<I>>) -> Self {
        PocketError::NomParseError(format!("{:?}", err))
    }
}
