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

//! Word types, following the basic tag set of the British National Corpus.

use crate::error::{PocketError, PocketResult};

/// Tags in word type order; must stay sorted
pub static TAGS: [&str; 39] = [
    "AJ0", "AJC", "AJS", "AT0", "AV0", "AVP", "AVQ", "CJC", "CJS", "CJT", "CRD", "DPS", "DT0",
    "DTQ", "EX0", "ITJ", "NN0", "NN1", "NN2", "NP0", "ORD", "PNI", "PNP", "PNQ", "PNX", "POS",
    "PRE", "PRF", "PRP", "TO0", "UNC", "VM0", "VVB", "VVD", "VVG", "VVN", "VVZ", "XX0", "ZZ0",
];

static NAMES: [&str; 39] = [
    "adjective",
    "comparative adjective",
    "superlative adjective",
    "article",
    "adverb",
    "adverb participle",
    "wh-adverb",
    "coordinating conjuction",
    "subordinating conjuction",
    "conjunction ‘that’",
    "cardinal number",
    "possessive determiner",
    "general determiner",
    "wh-determiner",
    "existential ‘there’",
    "interjection",
    "noun (neutral for number)",
    "singular noun",
    "plural noun",
    "proper noun",
    "ordinal",
    "indefinite pronoun",
    "personal pronoun",
    "wh-pronoun",
    "reflexive pronoun",
    "the possessive",
    "prefix",
    "the preposition ‘of’",
    "preposition",
    "the infinitive marker ‘to’",
    "unclassified",
    "verb modal auxiliary",
    "verb",
    "past tense",
    "present participle",
    "past participle",
    "3rd person singular",
    "negative participle",
    "alphabetical symbol",
];

// must stay sorted by source tag
static REMAP: [(&str, &str); 20] = [
    // a stray spelling of the proper noun tag
    ("P0", "NP0"),
    // forms of "be", "do" and "have" are plain verbs here
    ("VBB", "VVB"),
    ("VBD", "VVD"),
    ("VBG", "VVG"),
    ("VBI", "VVB"),
    ("VBN", "VVN"),
    ("VBZ", "VVZ"),
    ("VDB", "VVB"),
    ("VDD", "VVD"),
    ("VDG", "VVG"),
    ("VDI", "VVB"),
    ("VDN", "VVN"),
    ("VDZ", "VVZ"),
    ("VHB", "VVB"),
    ("VHD", "VVD"),
    ("VHG", "VVG"),
    ("VHI", "VVB"),
    ("VHN", "VVN"),
    ("VHZ", "VVZ"),
    // the infinitive is shown as the base form
    ("VVI", "VVB"),
];

/// Number of known word types
pub const COUNT: usize = TAGS.len();

/// Human readable name of a word type
pub fn name(word_type: u8) -> &'static str {
    NAMES.get(word_type as usize).copied().unwrap_or("unknown")
}

/// Resolves a single tag, applying the remapping table
pub fn tag_index(tag: &str) -> PocketResult<u8> {
    let tag = match REMAP.binary_search_by_key(&tag, |&(from, _)| from) {
        Ok(i) => REMAP[i].1,
        Err(_) => tag,
    };

    TAGS.binary_search(&tag)
        .map(|i| i as u8)
        .map_err(|_| PocketError::InvalidPartOfSpeech(tag.to_owned()))
}

/// Word type of a possibly compound tag such as `"VVZ+XX0"`.
///
/// Only the first part is used.
pub fn word_type(tags: &str) -> PocketResult<u8> {
    let first = tags.split('+').next().unwrap_or(tags);
    tag_index(first)
}

/// Word types of every part of a compound tag
pub fn word_types(tags: &str) -> PocketResult<Vec<u8>> {
    tags.split('+').map(tag_index).collect()
}
