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

use crate::error::TrieError;

/// Reads bit fields, least significant bit first, from a byte buffer.
///
/// A reader is created for a single decode and is not meant to be shared.
/// Bits left over from a partially used byte are kept for the next call.
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    start: usize,
    queue: u8,
    queue_length: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8], pos: usize) -> BitReader<'a> {
        BitReader {
            data,
            pos,
            start: pos,
            queue: 0,
            queue_length: 0,
        }
    }

    /// Drops buffered bits and moves the cursor to `pos`
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
        self.start = pos;
        self.queue = 0;
        self.queue_length = 0;
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8, TrieError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(TrieError::UnexpectedEof(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Returns the next `n_bits` bits (at most 32)
    pub fn read_bits(&mut self, n_bits: u8) -> Result<u32, TrieError> {
        debug_assert!(n_bits as u32 <= u32::BITS);

        let mut got = n_bits.min(self.queue_length);
        let mut result = (self.queue as u32) & ((u8::MAX as u32) >> (8 - got));

        self.queue = self.queue.checked_shr(got as u32).unwrap_or(0);
        self.queue_length -= got;

        while n_bits - got >= 8 {
            result |= (self.read_byte()? as u32) << got;
            got += 8;
        }

        let remainder = n_bits - got;

        if remainder > 0 {
            let byte = self.read_byte()?;
            self.queue_length = 8 - remainder;
            result |= ((byte & (u8::MAX >> self.queue_length)) as u32) << got;
            self.queue = byte >> remainder;
        }

        Ok(result)
    }

    /// Whole bytes pulled from the buffer since the last reset
    pub fn bytes_consumed(&self) -> usize {
        self.pos - self.start
    }
}
