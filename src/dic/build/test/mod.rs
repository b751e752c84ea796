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

use claim::{assert_matches, assert_ok};

use super::bit_writer::BitWriter;
use crate::dic::article::{load_article, variant_code, ArticleRef, UNKNOWN_VARIANT};
use crate::dic::build::DictBuilder;
use crate::dic::path::{decode_sense, MORE_ENTRIES};
use crate::dic::pos;
use crate::dic::trie::{index_width, Trie, ROOT, TERMINATOR};
use crate::dic::Dictionary;
use crate::prelude::*;

static LEXICON: &[u8] = include_bytes!("lexicon.json");

fn build() -> (DictBuilder, Dictionary) {
    let mut bldr = DictBuilder::new();
    assert_eq!(7, bldr.read_lexicon(LEXICON).unwrap());
    let mut built = Vec::new();
    let written = bldr.compile(&mut built).unwrap();
    assert_eq!(written, built.len());
    let dict = Dictionary::from_bytes(built).unwrap();
    (bldr, dict)
}

fn words(results: &[SearchResult]) -> Vec<(&str, &str)> {
    results
        .iter()
        .map(|r| (r.word.as_str(), r.translation.as_str()))
        .collect()
}

#[test]
fn prefix_search() {
    let (_, dict) = build();
    let results = dict.search("ca", 10).unwrap();
    assert_eq!(
        words(&results),
        [
            ("car", "𐑒𐑸"),
            ("car", "𐑒𐑸𐑮"),
            ("care", "𐑒𐑺"),
            ("cares", "𐑒𐑺𐑟"),
            ("cars", "𐑒𐑸𐑟"),
            ("cat", "𐑒𐑨𐑑"),
        ]
    );
    assert_eq!(results[0].article, ArticleRef(0));
    assert_eq!(results[2].article, ArticleRef(1));
    assert_eq!(results[5].article, ArticleRef(2));
    assert_eq!(results[0].word_type, pos::tag_index("NN1").unwrap());
    assert_eq!(results[3].word_type, pos::tag_index("VVZ").unwrap());

    let first = dict.search("ca", 3).unwrap();
    assert_eq!(words(&first), words(&results[..3]));
}

#[test]
fn renderings_are_headwords() {
    let (_, dict) = build();
    let senses = dict.lookup("𐑒𐑸").unwrap();
    assert_eq!(senses.len(), 1);
    assert_eq!(senses[0].rendering, "car");
    assert_eq!(senses[0].article, ArticleRef(0));

    let results = dict.search("𐑛", 10).unwrap();
    assert_eq!(words(&results), [("𐑛𐑪𐑜", "dog")]);
    assert_eq!(results[0].word_type, pos::tag_index("NN1").unwrap());
}

#[test]
fn every_word_is_listed() {
    let (_, dict) = build();
    let all: Vec<String> = dict.words().map(|w| w.unwrap().0).collect();
    assert_eq!(all.len(), 13);
    assert_eq!(&all[..6], ["car", "care", "cares", "cars", "cat", "dog"]);
    assert!(all.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn unknown_words() {
    let (_, dict) = build();
    assert_eq!(dict.search("cb", 10).unwrap().len(), 0);
    assert_eq!(dict.search("ca", 0).unwrap().len(), 0);
    assert_eq!(dict.find_word("ca").unwrap(), None);
    assert!(dict.lookup("cart").unwrap().is_empty());
}

#[test]
fn report_lists_steps() {
    let (bldr, _) = build();
    let parts: Vec<&str> = bldr.report().iter().map(|r| r.part()).collect();
    assert_eq!(parts[1..], ["index", "trie"]);
    assert!(!bldr.report()[0].is_write());
    // forward and reverse senses, "care" counted once
    assert_eq!(bldr.report()[1].size(), 14);
}

#[test]
fn articles_round_trip() {
    let (mut bldr, _) = build();
    let dir = tempfile::tempdir().unwrap();
    assert_ok!(bldr.write_articles(dir.path(), 2));
    assert!(dir.path().join("article-0000.bin").exists());
    assert!(dir.path().join("article-0002.bin").exists());

    let car = load_article(dir.path(), ArticleRef(0), 2).unwrap();
    assert_eq!(car.entries.len(), 2);
    assert_eq!(car.entries[0].headword, "car");
    assert_eq!(car.entries[0].variants.len(), 2);
    assert_eq!(car.entries[0].variants[1].variant, variant_code(Some("GenAm")));
    assert_eq!(car.entries[0].variants[1].ipa, "kɑɹ");
    assert_eq!(car.entries[1].headword, "cars");

    let care = load_article(dir.path(), ArticleRef(1), 2).unwrap();
    assert_eq!(care.entries.len(), 2);
    assert_eq!(care.entries[0].variants[0].variant, UNKNOWN_VARIANT);

    let dog = load_article(dir.path(), ArticleRef(3), 2).unwrap();
    assert_eq!(dog.entries[0].pos_names(), "singular noun + verb");

    assert_matches!(
        load_article(dir.path(), ArticleRef(4), 2),
        Err(PocketError::ArticleNotFound(4))
    );
}

#[test]
fn page_capacity_must_be_power_of_two() {
    let (mut bldr, _) = build();
    let dir = tempfile::tempdir().unwrap();
    assert_matches!(
        bldr.write_articles(dir.path(), 3),
        Err(PocketError::ConfigError(_))
    );
}

#[test]
fn lexicons_share_article_numbering() {
    let mut bldr = DictBuilder::new();
    bldr.read_lexicon(LEXICON).unwrap();
    bldr.read_lexicon(r#"{"ox_n": [{"Latn": "ox", "Shaw": "𐑪𐑒𐑕", "pos": "NN1"}]}"#.as_bytes())
        .unwrap();
    assert_eq!(bldr.n_articles(), 5);
    let mut built = Vec::new();
    bldr.compile(&mut built).unwrap();
    let dict = Dictionary::from_bytes(built).unwrap();
    assert_eq!(dict.lookup("ox").unwrap()[0].article, ArticleRef(4));
}

#[test]
fn failed_lexicon_adds_no_articles() {
    let mut bldr = DictBuilder::new();
    bldr.read_lexicon(LEXICON).unwrap();
    let bad = r#"{
        "ox_n": [{"Latn": "ox", "Shaw": "𐑪𐑒𐑕", "pos": "NN1"}],
        "bad": [{"Latn": "x", "Shaw": "𐑒", "pos": "QQQ"}]
    }"#;
    assert_matches!(
        bldr.read_lexicon(bad.as_bytes()),
        Err(PocketError::DictionaryCompilationError(_))
    );
    assert_eq!(bldr.n_articles(), 4);

    let mut built = Vec::new();
    bldr.compile(&mut built).unwrap();
    let dict = Dictionary::from_bytes(built).unwrap();
    assert!(dict.search("ox", 10).unwrap().is_empty());
    assert_eq!(dict.search("ca", 10).unwrap().len(), 6);
}

/// Sibling index and chain length of every step spelling `word`
fn path_steps(trie: Trie<'_>, word: &str) -> Vec<(usize, usize)> {
    let mut pos = ROOT;
    let mut steps = Vec::new();
    for ch in word.chars().chain(std::iter::once(TERMINATOR)) {
        let count = trie.sibling_count(pos).unwrap();
        let index = (0..count)
            .find(|&i| {
                let node = trie.advance_to_sibling(pos, i).unwrap();
                trie.decode_node(node).unwrap().label == ch
            })
            .unwrap();
        steps.push((index, count));
        let node = trie.advance_to_sibling(pos, index).unwrap();
        pos = trie.decode_node(node).unwrap().children;
    }
    steps
}

/// Encodes a payload entry, changing the width of step `skew.0` by `skew.1`
fn encode_entry(
    flags: u8,
    article: u16,
    steps: &[(usize, usize)],
    skew: Option<(usize, i8)>,
) -> Vec<u8> {
    let mut bits = BitWriter::new();
    for (k, &(index, count)) in steps.iter().enumerate() {
        let mut width = index_width(count) as i8;
        if let Some((at, delta)) = skew {
            if at == k {
                width += delta;
            }
        }
        bits.add_bits(index as u32, width as u8);
    }

    let mut entry = vec![flags];
    entry.extend_from_slice(&article.to_le_bytes());
    entry.extend(bits.finish());
    entry
}

/// Appends `entry` after the trie, returning the new buffer and the entry offset
fn append_entry(data: &[u8], entry: &[u8]) -> (Vec<u8>, usize) {
    let mut data = data.to_vec();
    let pos = data.len();
    data.extend_from_slice(entry);
    let len = (data.len() - 4) as u32;
    data[..4].copy_from_slice(&len.to_le_bytes());
    (data, pos)
}

#[test]
fn wrong_path_width_desynchronizes() {
    let (_, dict) = build();
    let car = dict.lookup("car").unwrap();
    let expected = &car[0];
    assert_eq!(expected.rendering, "𐑒𐑸");

    // 𐑒 of c/d/𐑒/𐑛, 𐑸 of 𐑨/𐑸/𐑺, terminator of \0/𐑟/𐑮
    let steps = path_steps(dict.trie(), &expected.rendering);
    assert_eq!(steps, [(2, 4), (1, 3), (0, 3)]);

    let flags = MORE_ENTRIES | expected.word_type;
    let article = expected.article.0;

    let entry = encode_entry(flags, article, &steps, None);
    let (data, pos) = append_entry(dict.data(), &entry);
    let sense = decode_sense(Trie::new(&data), pos).unwrap();
    assert_eq!(sense.rendering, expected.rendering);
    assert_eq!(sense.article, expected.article);
    assert_eq!(sense.next, Some(pos + entry.len()));

    // one bit more or less on the first step shifts every later index
    for delta in [1i8, -1] {
        let entry = encode_entry(flags, article, &steps, Some((0, delta)));
        let (data, pos) = append_entry(dict.data(), &entry);
        match decode_sense(Trie::new(&data), pos) {
            Ok(sense) => assert_ne!(sense.rendering, expected.rendering, "width {:+}", delta),
            Err(e) => {
                let err = PocketError::from(e);
                assert_matches!(err, PocketError::CorruptDictionary(_));
            }
        }
    }
}
