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

use std::iter::FusedIterator;

use serde::Serialize;

use crate::dic::article::ArticleRef;
use crate::dic::path::Senses;
use crate::dic::pos;
use crate::dic::trie::Trie;
use crate::error::TrieError;

/// One sense of a matching headword
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SearchResult {
    pub word: String,
    pub translation: String,
    pub word_type: u8,
    pub article: ArticleRef,
}

impl SearchResult {
    /// Human readable word type
    pub fn pos_name(&self) -> &'static str {
        pos::name(self.word_type)
    }
}

/// Depth-first iterator over every headword below a trie position.
///
/// Yields each headword with the offset of its payload, in ascending
/// code point order.
pub struct WordWalker<'a> {
    trie: Trie<'a>,
    // (node offset, length of the word above that node)
    stack: Vec<(usize, usize)>,
    word: String,
}

impl<'a> WordWalker<'a> {
    /// Starts from the chain at `pos`, whose parents spell `prefix`
    pub fn new(trie: Trie<'a>, pos: usize, prefix: &str) -> WordWalker<'a> {
        let word = String::from(prefix);
        WordWalker {
            trie,
            stack: vec![(pos, word.len())],
            word,
        }
    }

    /// Walks every headword of the trie
    pub fn all(trie: Trie<'a>) -> WordWalker<'a> {
        let mut walker = WordWalker::new(trie, crate::dic::trie::ROOT, "");
        if trie.is_empty() {
            walker.stack.clear();
        }
        walker
    }

    fn next_word(&mut self) -> Result<Option<(String, usize)>, TrieError> {
        while let Some((pos, len)) = self.stack.pop() {
            self.word.truncate(len);
            let node = self.trie.decode_node(pos)?;

            // the sibling is visited after this subtree
            if let Some(next) = node.next_sibling() {
                self.stack.push((next, len));
            }

            if node.is_terminator() {
                return Ok(Some((self.word.clone(), node.children)));
            }

            self.word.push(node.label);
            self.stack.push((node.children, self.word.len()));
        }

        Ok(None)
    }
}

impl Iterator for WordWalker<'_> {
    type Item = Result<(String, usize), TrieError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_word() {
            Ok(Some(w)) => Some(Ok(w)),
            Ok(None) => None,
            Err(e) => {
                self.stack.clear();
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for WordWalker<'_> {}

/// Finds up to `max_results` senses of the headwords starting with `prefix`.
///
/// Headwords come in ascending code point order, senses of one headword in
/// stored order. The prefix is used as is, see [`normalize_query`].
pub fn search(
    trie: Trie<'_>,
    prefix: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, TrieError> {
    let mut results = Vec::new();
    if max_results == 0 {
        return Ok(results);
    }

    let start = match trie.find_prefix(prefix.chars())? {
        Some(pos) => pos,
        None => return Ok(results),
    };

    for word in WordWalker::new(trie, start, prefix) {
        let (word, payload) = word?;

        for sense in Senses::new(trie, payload) {
            let sense = sense?;
            results.push(SearchResult {
                word: word.clone(),
                translation: sense.rendering,
                word_type: sense.word_type,
                article: sense.article,
            });

            if results.len() >= max_results {
                return Ok(results);
            }
        }
    }

    Ok(results)
}

/// Brings user input to the form headwords are stored in.
///
/// Lower-cases, replaces typographic apostrophes, and collapses whitespace.
pub fn normalize_query(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut space_queued = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            space_queued = true;
            continue;
        }

        if space_queued {
            if !result.is_empty() {
                result.push(' ');
            }
            space_queued = false;
        }

        match ch {
            '’' => result.push('\''),
            c => result.extend(c.to_lowercase()),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        assert_eq!(normalize_query("Hello"), "hello");
        assert_eq!(normalize_query("  Don’t   Stop \t"), "don't stop");
        assert_eq!(normalize_query("\n"), "");
        assert_eq!(normalize_query("ÉCOLE"), "école");
        assert_eq!(normalize_query("a\u{3000}b"), "a b");
    }

    // "ab" -> "b", "b" -> "ab"
    fn sample() -> Vec<u8> {
        let mut v = vec![0, 0, 0, 0];
        v.extend_from_slice(&[
            9, b'a', // 'a', next sibling at 14
            0, b'b', // 'b'
            0, 0, // terminator
            0x11, 0x03, 0x00, 0x01, // type 17, article 3, path 'b'
            0, b'b', // 'b'
            0, 0, // terminator
            0x12, 0x03, 0x00, 0x00, // type 18, article 3, path 'a' 'b'
        ]);
        let len = (v.len() - 4) as u32;
        v[..4].copy_from_slice(&len.to_le_bytes());
        v
    }

    #[test]
    fn walk_all_words() {
        let data = sample();
        let trie = Trie::new(&data);
        let words: Vec<(String, usize)> = WordWalker::all(trie).collect::<Result<_, _>>().unwrap();
        assert_eq!(words, vec![("ab".to_owned(), 10), ("b".to_owned(), 18)]);
    }

    #[test]
    fn search_prefixes() {
        let data = sample();
        let trie = Trie::new(&data);

        let all = search(trie, "", 10).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].word, "ab");
        assert_eq!(all[0].translation, "b");
        assert_eq!(all[0].word_type, 17);
        assert_eq!(all[0].pos_name(), "singular noun");
        assert_eq!(all[1].word, "b");
        assert_eq!(all[1].translation, "ab");
        assert_eq!(all[1].article, ArticleRef(3));

        assert_eq!(search(trie, "a", 10).unwrap(), all[..1].to_vec());
        assert_eq!(search(trie, "", 1).unwrap(), all[..1].to_vec());
        assert!(search(trie, "", 0).unwrap().is_empty());
        assert!(search(trie, "zzz", 10).unwrap().is_empty());
        assert!(search(trie, "abc", 10).unwrap().is_empty());
    }

    // "car", "care" and "cat" with the renderings "kar", "kɛːr" and "kat",
    // which are paths without payloads
    fn three_words() -> Vec<u8> {
        let mut v = vec![0, 0, 0, 0];
        v.extend_from_slice(&[
            27, b'c', // 4: 'c', next sibling 'k' at 32
            0, b'a', // 6
            15, b'r', // 8: next sibling 't' at 24
            5, 0, // 10: terminator, next sibling 'e' at 16
            0x05, 0x0b, 0x00, 0x01, // 12: type 5, article 11, path 1 0 0
            0, b'e', // 16
            0, 0, // 18: terminator
            0x01, 0x0c, 0x00, 0x03, // 20: type 1, article 12, path 1 1
            0, b't', // 24
            0, 0, // 26: terminator
            0x05, 0x0a, 0x00, 0x05, // 28: type 5, article 10, path 1 0 1
            0, b'k', // 32
            9, b'a', // 34: next sibling 'ɛ' at 44
            3, b'r', // 36: next sibling 't' at 40
            0, 0, // 38
            0, b't', // 40
            0, 0, // 42
            0, 0xc9, 0x9b, // 44: 'ɛ'
            0, 0xcb, 0x90, // 47: 'ː'
            0, b'r', // 50
            0, 0, // 52
        ]);
        let len = (v.len() - 4) as u32;
        v[..4].copy_from_slice(&len.to_le_bytes());
        v
    }

    #[test]
    fn search_hand_built_words() {
        let data = three_words();
        assert_eq!(data.len(), 54);
        let trie = Trie::new(&data);

        let results = search(trie, "ca", 10).unwrap();
        let found: Vec<(&str, &str, u8, ArticleRef)> = results
            .iter()
            .map(|r| (r.word.as_str(), r.translation.as_str(), r.word_type, r.article))
            .collect();
        assert_eq!(
            found,
            [
                ("car", "kar", 5, ArticleRef(11)),
                ("care", "kɛːr", 1, ArticleRef(12)),
                ("cat", "kat", 5, ArticleRef(10)),
            ]
        );

        assert_eq!(search(trie, "car", 10).unwrap(), results[..2].to_vec());
        assert_eq!(search(trie, "ca", 2).unwrap(), results[..2].to_vec());
        assert!(search(trie, "cab", 10).unwrap().is_empty());
    }

    #[test]
    fn empty_dictionary() {
        let data = [0u8, 0, 0, 0];
        let trie = Trie::new(&data);
        assert!(search(trie, "", 10).unwrap().is_empty());
        assert_eq!(WordWalker::all(trie).count(), 0);
    }
}
