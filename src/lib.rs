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

//! Compact spelling dictionary with prefix search and transliteration.
//!
//! The dictionary is a single buffer holding a sibling-chain trie. Each
//! headword carries one or more senses whose renderings are stored as
//! bit-packed paths through the same trie.
//!
//! The main entry point of the library is the
//! [`Dictionary`](dic/struct.Dictionary.html) handle. Dictionaries are
//! produced by [`DictBuilder`](dic/build/struct.DictBuilder.html).

pub mod config;
pub mod dic;
pub mod error;
pub mod transliteration;

pub mod prelude {
    pub use crate::{
        dic::search::{normalize_query, SearchResult},
        dic::{Dictionary, SharedDictionary},
        error::PocketError,
        error::PocketResult,
    };
}
