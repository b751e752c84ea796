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

//! Variable-length code point codec used for trie labels.
//!
//! This is the original, wider UTF-8 scheme: sequences can be up to 6 bytes
//! long, so any 31-bit value can be stored.

use crate::error::TrieError;

/// Longest encoded sequence
pub const MAX_LENGTH: usize = 6;

/// Number of bytes in a sequence starting with `first_byte`
#[inline]
pub fn length(first_byte: u8) -> usize {
    match first_byte.leading_ones() {
        0 => 1,
        n @ 2..=5 => n as usize,
        // stray continuation bytes count as a single byte
        1 => 1,
        _ => MAX_LENGTH,
    }
}

/// Payload bits carried by a lead byte of a sequence with the given length
#[inline]
fn lead_mask(len: usize) -> u8 {
    match len {
        1 => 0x7f,
        _ => 0xff >> (len + 1),
    }
}

/// Decodes the code point starting at `offset`.
///
/// Returns the code point and the length of its encoding.
/// Continuation bytes are not validated.
pub fn decode(buf: &[u8], offset: usize) -> Result<(u32, usize), TrieError> {
    let first = *buf.get(offset).ok_or(TrieError::UnexpectedEof(offset))?;
    let len = length(first);
    let tail = buf
        .get(offset + 1..offset + len)
        .ok_or(TrieError::UnexpectedEof(offset))?;

    let mut value = (first & lead_mask(len)) as u32;
    for &b in tail {
        value = (value << 6) | (b & 0x3f) as u32;
    }

    Ok((value, len))
}

/// Decodes the code point at `offset` as a `char`.
///
/// Values outside of the Unicode scalar range are reported as invalid.
pub fn decode_char(buf: &[u8], offset: usize) -> Result<(char, usize), TrieError> {
    let (cp, len) = decode(buf, offset)?;
    match char::from_u32(cp) {
        Some(c) => Ok((c, len)),
        None => Err(TrieError::InvalidCharacter(offset)),
    }
}

/// Number of bytes needed to encode `cp`
pub fn encoded_length(cp: u32) -> usize {
    match cp {
        0..=0x7f => 1,
        0x80..=0x7ff => 2,
        0x800..=0xffff => 3,
        0x1_0000..=0x1f_ffff => 4,
        0x20_0000..=0x3ff_ffff => 5,
        _ => 6,
    }
}

/// Encodes `cp` into `out`, returning the number of bytes written.
///
/// Only the low 31 bits of `cp` are representable.
pub fn encode(cp: u32, out: &mut [u8; MAX_LENGTH]) -> usize {
    let len = encoded_length(cp);
    if len == 1 {
        out[0] = cp as u8;
        return 1;
    }

    let mut rest = cp;
    for i in (1..len).rev() {
        out[i] = 0x80 | (rest & 0x3f) as u8;
        rest >>= 6;
    }
    let marker = !(0xffu8 >> len);
    out[0] = marker | (rest as u8 & lead_mask(len));
    len
}
