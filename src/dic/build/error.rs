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

use crate::error::PocketError;
use crate::prelude::PocketResult;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("{file}:{article}\t{cause}")]
pub struct DicBuildError {
    pub file: String,
    pub article: String,
    pub cause: BuildFailure,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BuildFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Unknown part of speech {tag:?} for {headword}/{rendering}")]
    UnknownPartOfSpeech {
        tag: String,
        headword: String,
        rendering: String,
    },

    #[error("Word {0:?} is empty or contains a NUL character")]
    InvalidWord(String),

    #[error("Too many articles: {0}, at most {} are supported", u16::MAX as usize + 1)]
    TooManyArticles(usize),

    #[error("Word type {0} does not fit in 7 bits")]
    InvalidWordType(u8),

    #[error("Rendering {0:?} is not a path in the trie")]
    MissingPath(String),

    #[error("Dictionary of {0} bytes is too large")]
    TooLarge(usize),
}

/// Where in the source lexicon the builder currently is
pub struct DicCompilationCtx {
    name: String,
    article: String,
}

impl Default for DicCompilationCtx {
    fn default() -> Self {
        DicCompilationCtx::memory()
    }
}

impl DicCompilationCtx {
    pub fn memory() -> Self {
        DicCompilationCtx {
            name: "<memory>".to_owned(),
            article: String::new(),
        }
    }

    pub fn err<T, E: Into<BuildFailure>>(&self, reason: E) -> PocketResult<T> {
        Err(self.to_pocket_err(reason))
    }

    pub fn to_pocket_err<E: Into<BuildFailure>>(&self, reason: E) -> PocketError {
        match reason.into() {
            BuildFailure::Io(e) => e.into(),
            reason => DicBuildError {
                file: self.name.clone(),
                article: self.article.clone(),
                cause: reason,
            }
            .into(),
        }
    }

    pub fn set_filename(&mut self, new_name: String) -> String {
        std::mem::replace(&mut self.name, new_name)
    }

    pub fn set_article<S: Into<String>>(&mut self, article: S) -> String {
        std::mem::replace(&mut self.article, article.into())
    }
}
