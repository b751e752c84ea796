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

//! Builds the sibling-chain trie with its payloads.
//!
//! Nodes live in an arena and refer to their children by index. Children
//! are kept sorted by label, so the terminator always comes first.

use std::io::Write;

use crate::dic::build::bit_writer::BitWriter;
use crate::dic::build::error::BuildFailure;
use crate::dic::path::{ENTRY_HEADER_SIZE, MORE_ENTRIES, WORD_TYPE_MASK};
use crate::dic::trie::{index_width, TERMINATOR};
use crate::dic::utf8;

const ROOT: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Sense {
    word_type: u8,
    article: u16,
    rendering: String,
}

struct Node {
    label: char,
    children: Vec<usize>,
    // only terminators carry senses
    senses: Vec<Sense>,
}

impl Node {
    fn new(label: char) -> Node {
        Node {
            label,
            children: Vec::new(),
            senses: Vec::new(),
        }
    }
}

/// Sizes computed before writing
struct Layout {
    sibling_offset: Vec<usize>,
    total: Vec<usize>,
    payloads: Vec<Vec<u8>>,
}

pub struct TrieBuilder {
    nodes: Vec<Node>,
    n_senses: usize,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieBuilder {
    pub fn new() -> TrieBuilder {
        TrieBuilder {
            nodes: vec![Node::new(TERMINATOR)],
            n_senses: 0,
        }
    }

    /// Number of distinct senses added
    pub fn n_senses(&self) -> usize {
        self.n_senses
    }

    /// Number of trie nodes, the root excluded
    pub fn n_nodes(&self) -> usize {
        self.nodes.len() - 1
    }

    fn child(&self, node: usize, label: char) -> Result<usize, usize> {
        let nodes = &self.nodes;
        nodes[node]
            .children
            .binary_search_by_key(&label, |&c| nodes[c].label)
    }

    /// Returns the terminator node of `word`, creating the path if needed
    fn insert(&mut self, word: &str) -> usize {
        let mut node = ROOT;

        for ch in word.chars().chain(std::iter::once(TERMINATOR)) {
            node = match self.child(node, ch) {
                Ok(i) => self.nodes[node].children[i],
                Err(i) => {
                    let new_node = self.nodes.len();
                    self.nodes.push(Node::new(ch));
                    self.nodes[node].children.insert(i, new_node);
                    new_node
                }
            };
        }

        node
    }

    /// Adds a sense to `headword`, rendered as `rendering`.
    ///
    /// The rendering must itself be added as a headword before the trie is
    /// written. Repeated senses are ignored.
    pub fn add_sense(
        &mut self,
        headword: &str,
        rendering: &str,
        word_type: u8,
        article: u16,
    ) -> Result<(), BuildFailure> {
        if word_type & !WORD_TYPE_MASK != 0 {
            return Err(BuildFailure::InvalidWordType(word_type));
        }
        for w in [headword, rendering] {
            if w.is_empty() || w.contains(TERMINATOR) {
                return Err(BuildFailure::InvalidWord(w.to_owned()));
            }
        }

        let sense = Sense {
            word_type,
            article,
            rendering: rendering.to_owned(),
        };
        let term = self.insert(headword);
        let senses = &mut self.nodes[term].senses;
        if !senses.contains(&sense) {
            senses.push(sense);
            self.n_senses += 1;
        }
        Ok(())
    }

    /// Adds a sense in both directions, so each word renders as the other
    pub fn add_word(
        &mut self,
        headword: &str,
        rendering: &str,
        word_type: u8,
        article: u16,
    ) -> Result<(), BuildFailure> {
        self.add_sense(headword, rendering, word_type, article)?;
        self.add_sense(rendering, headword, word_type, article)
    }

    /// Encodes the path leading to the terminator of `word`
    fn encode_path(&self, word: &str, out: &mut BitWriter) -> Result<(), BuildFailure> {
        let mut node = ROOT;

        for ch in word.chars().chain(std::iter::once(TERMINATOR)) {
            let children = &self.nodes[node].children;
            let index = self
                .child(node, ch)
                .map_err(|_| BuildFailure::MissingPath(word.to_owned()))?;
            out.add_bits(index as u32, index_width(children.len()));
            node = children[index];
        }

        Ok(())
    }

    fn encode_payload(&self, senses: &[Sense]) -> Result<Vec<u8>, BuildFailure> {
        let mut payload = Vec::with_capacity(senses.len() * (ENTRY_HEADER_SIZE + 2));

        for (i, sense) in senses.iter().enumerate() {
            let more = if i + 1 < senses.len() { MORE_ENTRIES } else { 0 };
            payload.push(sense.word_type | more);
            payload.extend_from_slice(&sense.article.to_le_bytes());

            let mut path = BitWriter::new();
            self.encode_path(&sense.rendering, &mut path)?;
            payload.extend_from_slice(&path.finish());
        }

        Ok(payload)
    }

    fn layout(&self) -> Result<Layout, BuildFailure> {
        let n = self.nodes.len();
        let mut has_sibling = vec![false; n];
        for node in &self.nodes {
            if let Some((_, init)) = node.children.split_last() {
                for &c in init {
                    has_sibling[c] = true;
                }
            }
        }

        let mut payloads = vec![Vec::new(); n];
        let mut sibling_offset = vec![0; n];
        let mut total = vec![0; n];

        // children are always created after their parent
        for i in (1..n).rev() {
            let node = &self.nodes[i];
            let label_len = utf8::encoded_length(node.label as u32);

            let content = if node.label == TERMINATOR {
                payloads[i] = self.encode_payload(&node.senses)?;
                label_len + payloads[i].len()
            } else {
                label_len + node.children.iter().map(|&c| total[c]).sum::<usize>()
            };

            if has_sibling[i] {
                sibling_offset[i] = content;
            }
            total[i] = varint_len(sibling_offset[i]) + content;
        }

        Ok(Layout {
            sibling_offset,
            total,
            payloads,
        })
    }

    /// Writes the length header and the trie, returning the bytes written
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize, BuildFailure> {
        let layout = self.layout()?;
        let size: usize = self.nodes[ROOT]
            .children
            .iter()
            .map(|&c| layout.total[c])
            .sum();
        if size > u32::MAX as usize {
            return Err(BuildFailure::TooLarge(size));
        }

        w.write_all(&(size as u32).to_le_bytes())?;

        let mut stack: Vec<usize> = self.nodes[ROOT].children.iter().rev().copied().collect();
        let mut buf = [0u8; utf8::MAX_LENGTH];

        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            write_varint(layout.sibling_offset[i], w)?;
            let len = utf8::encode(node.label as u32, &mut buf);
            w.write_all(&buf[..len])?;

            if node.label == TERMINATOR {
                w.write_all(&layout.payloads[i])?;
            } else {
                stack.extend(node.children.iter().rev());
            }
        }

        Ok(size + 4)
    }
}

/// Bytes taken by `value` as a base-128 varint
pub fn varint_len(value: usize) -> usize {
    let n_bits = (usize::BITS - value.leading_zeros()).max(1) as usize;
    (n_bits + 6) / 7
}

/// Writes `value` as a base-128 varint, low digits first
pub fn write_varint<W: Write>(mut value: usize, w: &mut W) -> std::io::Result<usize> {
    let mut buf = [0u8; (usize::BITS as usize + 6) / 7];
    let mut len = 0;

    loop {
        buf[len] = value as u8 & 0x7f;
        value >>= 7;
        if value == 0 {
            len += 1;
            break;
        }
        buf[len] |= 0x80;
        len += 1;
    }

    w.write_all(&buf[..len])?;
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dic::trie::{Trie, ROOT as TRIE_ROOT};

    #[test]
    fn varint_sizes() {
        assert_eq!(varint_len(0), 1);
        assert_eq!(varint_len(0x7f), 1);
        assert_eq!(varint_len(0x80), 2);
        assert_eq!(varint_len(u32::MAX as usize), 5);

        let mut out = Vec::new();
        assert_eq!(write_varint(0x80, &mut out).unwrap(), 2);
        assert_eq!(out, [0x80, 0x01]);
        out.clear();
        write_varint(u32::MAX as usize, &mut out).unwrap();
        assert_eq!(out, [0xff, 0xff, 0xff, 0xff, 0x0f]);
        let t = Trie::new(&out);
        assert_eq!(t.read_varint(0), Ok((u32::MAX as usize, 5)));
    }

    #[test]
    fn layout_of_two_words() {
        let mut builder = TrieBuilder::new();
        builder.add_word("a", "b", 3, 7).unwrap();

        let mut out = Vec::new();
        let written = builder.write_to(&mut out).unwrap();
        assert_eq!(written, out.len());
        assert_eq!(
            out,
            [
                16, 0, 0, 0, // length
                7, b'a', // 'a', next sibling 7 bytes after the label
                0, 0, // terminator
                3, 7, 0, 0x01, // path 'b'
                0, b'b', // 'b'
                0, 0, // terminator
                3, 7, 0, 0x00, // path 'a'
            ]
        );
    }

    #[test]
    fn children_are_sorted() {
        let mut builder = TrieBuilder::new();
        for (w, r) in [("c", "z"), ("a", "y"), ("b", "x"), ("ab", "w")] {
            builder.add_word(w, r, 0, 0).unwrap();
        }
        let mut out = Vec::new();
        builder.write_to(&mut out).unwrap();

        let trie = Trie::new(&out);
        let mut pos = Some(TRIE_ROOT);
        let mut labels = String::new();
        while let Some(p) = pos {
            let node = trie.decode_node(p).unwrap();
            labels.push(node.label);
            pos = node.next_sibling();
        }
        assert_eq!(labels, "abcwxyz");

        let a = trie.find_prefix("a".chars()).unwrap().unwrap();
        assert!(trie.decode_node(a).unwrap().is_terminator());
    }

    #[test]
    fn repeated_senses_are_merged() {
        let mut builder = TrieBuilder::new();
        builder.add_word("a", "b", 3, 7).unwrap();
        builder.add_word("a", "b", 3, 7).unwrap();
        builder.add_word("a", "b", 4, 7).unwrap();
        assert_eq!(builder.n_senses(), 4);
        assert_eq!(builder.n_nodes(), 4);
    }

    #[test]
    fn missing_rendering_is_an_error() {
        let mut builder = TrieBuilder::new();
        builder.add_sense("a", "b", 0, 0).unwrap();
        assert!(matches!(
            builder.write_to(&mut Vec::new()),
            Err(BuildFailure::MissingPath(w)) if w == "b"
        ));
    }

    #[test]
    fn invalid_input() {
        let mut builder = TrieBuilder::new();
        assert!(matches!(
            builder.add_sense("a", "b", 0x80, 0),
            Err(BuildFailure::InvalidWordType(0x80))
        ));
        assert!(matches!(
            builder.add_sense("", "b", 0, 0),
            Err(BuildFailure::InvalidWord(_))
        ));
        assert!(matches!(
            builder.add_sense("a\0", "b", 0, 0),
            Err(BuildFailure::InvalidWord(_))
        ));
    }

    #[test]
    fn empty_trie() {
        let mut out = Vec::new();
        assert_eq!(TrieBuilder::new().write_to(&mut out).unwrap(), 4);
        assert_eq!(out, [0, 0, 0, 0]);
    }
}
