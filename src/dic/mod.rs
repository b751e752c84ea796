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

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use nom::number::complete::le_u32;
use tracing::{debug, info};

use crate::dic::path::{Sense, Senses};
use crate::dic::search::{SearchResult, WordWalker};
use crate::dic::storage::Storage;
use crate::dic::trie::Trie;
use crate::error::{PocketNomResult, TrieError};
use crate::prelude::*;

pub mod article;
pub mod bit_reader;
pub mod build;
pub mod path;
pub mod pos;
pub mod search;
pub mod storage;
pub mod trie;
pub mod utf8;

/// Size of the length header in front of the trie
pub const HEADER_SIZE: usize = 4;

fn length_parser(input: &[u8]) -> PocketNomResult<&[u8], u32> {
    le_u32(input)
}

/// Checks that the length header matches the size of the buffer
pub fn check_length(data: &[u8]) -> Result<(), TrieError> {
    let (rest, declared) =
        length_parser(data).map_err(|_| TrieError::UnexpectedEof(data.len()))?;

    if declared as usize != rest.len() {
        return Err(TrieError::InvalidLengthHeader {
            declared: declared as usize,
            actual: rest.len(),
        });
    }

    Ok(())
}

/// A loaded dictionary.
///
/// The handle is cheap to clone and can be shared between threads; every
/// query keeps its traversal state to itself.
#[derive(Clone)]
pub struct Dictionary {
    storage: Arc<Storage>,
}

impl Dictionary {
    /// Memory-maps and validates the dictionary file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> PocketResult<Dictionary> {
        let path = path.as_ref();
        let dict = Self::from_storage(Storage::map_file(path)?)
            .map_err(|e| e.with_context(path.to_string_lossy()))?;
        info!(path = %path.display(), size = dict.data().len(), "loaded dictionary");
        Ok(dict)
    }

    pub fn from_storage(storage: Storage) -> PocketResult<Dictionary> {
        check_length(storage.as_ref())?;
        Ok(Dictionary {
            storage: Arc::new(storage),
        })
    }

    pub fn from_bytes(data: Vec<u8>) -> PocketResult<Dictionary> {
        Self::from_storage(Storage::Owned(data))
    }

    pub fn from_static(data: &'static [u8]) -> PocketResult<Dictionary> {
        Self::from_storage(Storage::Borrowed(data))
    }

    /// Whole dictionary buffer, length header included
    pub fn data(&self) -> &[u8] {
        let storage: &Storage = &self.storage;
        storage.as_ref()
    }

    pub fn trie(&self) -> Trie<'_> {
        Trie::new(self.data())
    }

    /// Prefix search, see [`search::search`]
    pub fn search(&self, prefix: &str, max_results: usize) -> PocketResult<Vec<SearchResult>> {
        Ok(search::search(self.trie(), prefix, max_results)?)
    }

    /// Payload offset of an exact headword
    pub fn find_word(&self, word: &str) -> PocketResult<Option<usize>> {
        Ok(self.trie().find_word(word)?)
    }

    /// Every sense of an exact headword, in stored order
    pub fn lookup(&self, word: &str) -> PocketResult<Vec<Sense>> {
        match self.find_word(word)? {
            Some(pos) => Ok(Senses::new(self.trie(), pos).collect::<Result<_, _>>()?),
            None => Ok(Vec::new()),
        }
    }

    /// Every headword with its payload offset
    pub fn words(&self) -> WordWalker<'_> {
        WordWalker::all(self.trie())
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("size", &self.data().len())
            .finish()
    }
}

/// A dictionary file loaded on first use.
///
/// Every successful [`get`](SharedDictionary::get) returns a handle to the
/// same buffer. A failed load is reported to the caller and retried by the
/// next one.
pub struct SharedDictionary {
    path: PathBuf,
    loaded: OnceLock<Dictionary>,
    loading: Mutex<()>,
}

impl SharedDictionary {
    pub fn new<P: Into<PathBuf>>(path: P) -> SharedDictionary {
        SharedDictionary {
            path: path.into(),
            loaded: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> PocketResult<Dictionary> {
        if let Some(dict) = self.loaded.get() {
            return Ok(dict.clone());
        }

        // a panic while loading leaves nothing behind to protect
        let _guard = self.loading.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(dict) = self.loaded.get() {
            return Ok(dict.clone());
        }

        debug!(path = %self.path.display(), "loading shared dictionary");
        let dict = Dictionary::load(&self.path)?;
        Ok(self.loaded.get_or_init(|| dict).clone())
    }

    /// Whether the dictionary has been loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}
