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

#![allow(dead_code)]

use pocketrl::dic::build::DictBuilder;
use pocketrl::prelude::*;

pub const LEXICON: &[u8] = include_bytes!("../resources/lexicon.json");

/// Compiles a JSON lexicon into dictionary bytes
pub fn compile(lexicon: &[u8]) -> Vec<u8> {
    let mut builder = DictBuilder::new();
    builder
        .read_lexicon(lexicon)
        .expect("Failed to read test lexicon");
    let mut built = Vec::new();
    builder
        .compile(&mut built)
        .expect("Failed to compile test dictionary");
    built
}

/// Copy of `data` with the length header matching its new size
pub fn with_fixed_header(mut data: Vec<u8>) -> Vec<u8> {
    let len = (data.len() - 4) as u32;
    data[..4].copy_from_slice(&len.to_le_bytes());
    data
}

lazy_static! {
    pub static ref DICTIONARY_BYTES: Vec<u8> = compile(LEXICON);
    pub static ref DICTIONARY: Dictionary = Dictionary::from_bytes(DICTIONARY_BYTES.clone())
        .expect("Failed to load test dictionary");
}

pub fn words(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.word.as_str()).collect()
}
