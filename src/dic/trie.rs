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

//! Read-only view of the sibling-chain trie.
//!
//! Every node is `varint sibling_offset` followed by one encoded label.
//! The sibling offset counts bytes from the label to the next sibling,
//! zero marks the last node of a chain. The children of a node (or the
//! payload, for a terminator) start right after its label.

use crate::dic::utf8;
use crate::error::TrieError;

/// Byte offset of the first root node
pub const ROOT: usize = 4;

/// Label marking the end of a headword
pub const TERMINATOR: char = '\0';

/// One decoded trie node
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Node {
    /// Offset of the first byte of the node
    pub pos: usize,
    pub sibling_offset: usize,
    pub label: char,
    /// Offset of the encoded label
    pub label_pos: usize,
    /// Offset of the child chain, or of the payload for a terminator
    pub children: usize,
}

impl Node {
    #[inline]
    pub fn is_terminator(&self) -> bool {
        self.label == TERMINATOR
    }

    #[inline]
    pub fn next_sibling(&self) -> Option<usize> {
        match self.sibling_offset {
            0 => None,
            off => Some(self.label_pos.saturating_add(off)),
        }
    }
}

/// Trie primitives over a dictionary buffer
#[derive(Clone, Copy)]
pub struct Trie<'a> {
    data: &'a [u8],
}

impl<'a> Trie<'a> {
    pub fn new(data: &'a [u8]) -> Trie<'a> {
        Trie { data }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Whether the buffer holds no nodes at all
    pub fn is_empty(&self) -> bool {
        self.data.len() <= ROOT
    }

    /// Reads a base-128 varint, returning its value and encoded length
    pub fn read_varint(&self, pos: usize) -> Result<(usize, usize), TrieError> {
        let mut value = 0usize;
        let mut len = 0usize;

        loop {
            let byte = *self
                .data
                .get(pos + len)
                .ok_or(TrieError::UnexpectedEof(pos + len))?;

            if (len + 1) * 7 > usize::BITS as usize {
                return Err(TrieError::OffsetTooLong(pos));
            }

            value |= (byte as usize & 0x7f) << (len * 7);
            len += 1;

            if byte & 0x80 == 0 {
                return Ok((value, len));
            }
        }
    }

    /// Decodes the node starting at `pos`
    pub fn decode_node(&self, pos: usize) -> Result<Node, TrieError> {
        let (sibling_offset, offset_len) = self.read_varint(pos)?;
        let label_pos = pos + offset_len;
        let (label, label_len) = utf8::decode_char(self.data, label_pos)?;

        Ok(Node {
            pos,
            sibling_offset,
            label,
            label_pos,
            children: label_pos + label_len,
        })
    }

    /// Offset of the sibling following the node at `pos`, if any
    #[inline]
    fn next_sibling(&self, pos: usize) -> Result<Option<usize>, TrieError> {
        let (offset, len) = self.read_varint(pos)?;
        match offset {
            0 => Ok(None),
            off => Ok(Some((pos + len).saturating_add(off))),
        }
    }

    /// Number of nodes in the chain starting at `pos`, including that node
    pub fn sibling_count(&self, mut pos: usize) -> Result<usize, TrieError> {
        let mut count = 1;

        while let Some(next) = self.next_sibling(pos)? {
            pos = next;
            count += 1;
        }

        Ok(count)
    }

    /// Skips `k` siblings forward.
    ///
    /// Stops at the last node of the chain if it has fewer than `k` followers.
    pub fn advance_to_sibling(&self, mut pos: usize, k: usize) -> Result<usize, TrieError> {
        for _ in 0..k {
            match self.next_sibling(pos)? {
                Some(next) => pos = next,
                None => break,
            }
        }

        Ok(pos)
    }

    /// Scans the chain at `pos` for a node labelled `ch` and returns the
    /// offset of its children.
    pub fn find_child(&self, mut pos: usize, ch: char) -> Result<Option<usize>, TrieError> {
        loop {
            let node = self.decode_node(pos)?;

            if node.label == ch {
                return Ok(Some(node.children));
            }

            match node.next_sibling() {
                Some(next) => pos = next,
                None => return Ok(None),
            }
        }
    }

    /// Walks the path spelled by `prefix` from the root.
    ///
    /// Returns the offset of the chain holding every extension of the prefix.
    pub fn find_prefix<I: IntoIterator<Item = char>>(
        &self,
        prefix: I,
    ) -> Result<Option<usize>, TrieError> {
        if self.is_empty() {
            return Ok(None);
        }

        let mut pos = ROOT;

        for ch in prefix {
            // the terminator cannot be searched for
            if ch == TERMINATOR {
                return Ok(None);
            }

            pos = match self.find_child(pos, ch)? {
                Some(p) => p,
                None => return Ok(None),
            };
        }

        Ok(Some(pos))
    }

    /// Returns the payload offset of an exact headword
    pub fn find_word(&self, word: &str) -> Result<Option<usize>, TrieError> {
        match self.find_prefix(word.chars())? {
            Some(pos) => self.find_child(pos, TERMINATOR),
            None => Ok(None),
        }
    }
}

/// Minimal number of bits to store an index into a chain of `count` siblings
#[inline]
pub fn index_width(count: usize) -> u8 {
    debug_assert!(count > 0);
    (usize::BITS - count.saturating_sub(1).leading_zeros()) as u8
}
