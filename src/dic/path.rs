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

//! Payload entries and the bit-packed paths inside them.
//!
//! A payload entry is `u8 flags_and_type`, `u16le article`, then a path:
//! for every step from the root, the index of the chosen sibling stored in
//! `index_width(sibling_count)` bits. The path ends on a terminator.

use std::iter::FusedIterator;

use crate::dic::article::ArticleRef;
use crate::dic::bit_reader::BitReader;
use crate::dic::trie::{index_width, Trie, ROOT};
use crate::error::TrieError;

/// Set in the first byte when another entry follows
pub const MORE_ENTRIES: u8 = 0x80;
/// Word type bits of the first byte
pub const WORD_TYPE_MASK: u8 = 0x7f;
/// Bytes before the path starts
pub const ENTRY_HEADER_SIZE: usize = 3;

/// Replays a path from the trie root, yielding one character per step
pub struct PathWalker<'a> {
    trie: Trie<'a>,
    node_pos: usize,
    reader: BitReader<'a>,
    start: usize,
    steps: usize,
    finished: bool,
}

impl<'a> PathWalker<'a> {
    /// Creates a walker for the path encoded at `pos`
    pub fn new(trie: Trie<'a>, pos: usize) -> PathWalker<'a> {
        PathWalker {
            trie,
            node_pos: ROOT,
            reader: BitReader::new(trie.data(), pos),
            start: pos,
            steps: 0,
            finished: false,
        }
    }

    fn next_char(&mut self) -> Result<Option<char>, TrieError> {
        if self.finished {
            return Ok(None);
        }

        // every step moves forward, so valid offsets hit the end of the
        // buffer before this bound
        if self.steps > self.trie.data().len() {
            return Err(TrieError::UnterminatedPath(self.start));
        }
        self.steps += 1;

        let n_siblings = self.trie.sibling_count(self.node_pos)?;
        let index = self.reader.read_bits(index_width(n_siblings))?;
        let pos = self.trie.advance_to_sibling(self.node_pos, index as usize)?;
        let node = self.trie.decode_node(pos)?;

        if node.is_terminator() {
            self.finished = true;
            Ok(None)
        } else {
            self.node_pos = node.children;
            Ok(Some(node.label))
        }
    }

    /// Reads the rest of the path into `out`
    pub fn read_into(&mut self, out: &mut String) -> Result<(), TrieError> {
        while let Some(ch) = self.next_char()? {
            out.push(ch);
        }
        Ok(())
    }

    /// Whether the terminator has been reached
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes of path data read so far
    pub fn bytes_consumed(&self) -> usize {
        self.reader.bytes_consumed()
    }
}

impl Iterator for PathWalker<'_> {
    type Item = Result<char, TrieError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_char() {
            Ok(Some(ch)) => Some(Ok(ch)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for PathWalker<'_> {}

/// One decoded payload entry
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Sense {
    pub word_type: u8,
    pub article: ArticleRef,
    pub rendering: String,
    /// Offset of the following entry of the same headword
    pub next: Option<usize>,
}

/// Decodes the payload entry at `pos`
pub fn decode_sense(trie: Trie<'_>, pos: usize) -> Result<Sense, TrieError> {
    let header = trie
        .data()
        .get(pos..pos + ENTRY_HEADER_SIZE)
        .ok_or(TrieError::UnexpectedEof(pos))?;
    let flags = header[0];
    let article = u16::from_le_bytes([header[1], header[2]]);

    let path_pos = pos + ENTRY_HEADER_SIZE;
    let mut walker = PathWalker::new(trie, path_pos);
    let mut rendering = String::new();
    walker.read_into(&mut rendering)?;

    let next = if flags & MORE_ENTRIES != 0 {
        Some(path_pos + walker.bytes_consumed())
    } else {
        None
    };

    Ok(Sense {
        word_type: flags & WORD_TYPE_MASK,
        article: ArticleRef(article),
        rendering,
        next,
    })
}

/// Iterates over the chained payload entries of one headword
pub struct Senses<'a> {
    trie: Trie<'a>,
    pos: Option<usize>,
}

impl<'a> Senses<'a> {
    pub fn new(trie: Trie<'a>, pos: usize) -> Senses<'a> {
        Senses {
            trie,
            pos: Some(pos),
        }
    }
}

impl Iterator for Senses<'_> {
    type Item = Result<Sense, TrieError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos.take()?;
        let result = decode_sense(self.trie, pos);
        if let Ok(sense) = &result {
            self.pos = sense.next;
        }
        Some(result)
    }
}

impl FusedIterator for Senses<'_> {}
