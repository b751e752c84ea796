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

/// Packs bit fields, least significant bit first.
///
/// The last byte is padded with zero bits.
#[derive(Default)]
pub struct BitWriter {
    output: Vec<u8>,
    queue: u8,
    queue_length: u8,
}

impl BitWriter {
    pub fn new() -> BitWriter {
        Self::default()
    }

    /// Appends the low `n_bits` bits of `bits` (at most 32)
    pub fn add_bits(&mut self, mut bits: u32, mut n_bits: u8) {
        debug_assert!(n_bits as u32 <= u32::BITS);

        if n_bits == 0 {
            return;
        }

        if self.queue_length > 0 {
            let align_bits = 8 - self.queue_length;

            if align_bits > n_bits {
                self.queue |= ((bits & ((1 << n_bits) - 1)) << self.queue_length) as u8;
                self.queue_length += n_bits;
                return;
            }

            let low = (bits as u8) & (u8::MAX >> (8 - align_bits));
            self.output.push(self.queue | (low << self.queue_length));
            n_bits -= align_bits;
            bits = bits.checked_shr(align_bits as u32).unwrap_or(0);
        }

        let n_bytes = (n_bits / 8) as usize;
        self.output.extend_from_slice(&bits.to_le_bytes()[..n_bytes]);

        n_bits -= n_bytes as u8 * 8;
        bits = bits.checked_shr(n_bytes as u32 * 8).unwrap_or(0);

        self.queue_length = n_bits;
        self.queue = (bits as u8) & !(u8::MAX.checked_shl(n_bits as u32).unwrap_or(0));
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.queue_length > 0 {
            self.output.push(self.queue);
        }
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dic::bit_reader::BitReader;

    static TEST_VALUES: [u32; 5] = [0, u32::MAX, 0x10101010, 0x05050505, 0x87654321];

    #[test]
    fn one_bit_at_a_time() {
        for &value in TEST_VALUES.iter() {
            let mut writer = BitWriter::new();
            for i in 0..u32::BITS {
                writer.add_bits(value >> i, 1);
            }
            assert_eq!(writer.finish(), value.to_le_bytes());
        }
    }

    #[test]
    fn bytes_in_the_middle() {
        for &value in TEST_VALUES.iter() {
            let mut writer = BitWriter::new();
            writer.add_bits(value, 1);
            writer.add_bits(value >> 1, 30);
            writer.add_bits(value >> 31, 1);
            assert_eq!(writer.finish(), value.to_le_bytes());
        }
    }

    #[test]
    fn dangling_data() {
        let mut writer = BitWriter::new();
        writer.add_bits(0x1e, 8);
        writer.add_bits(0x0265, 10);
        assert_eq!(writer.finish(), [0x1e, 0x65, 0x02]);
    }

    #[test]
    fn high_bits_are_ignored() {
        let mut writer = BitWriter::new();
        writer.add_bits(0xff, 1);
        writer.add_bits(0, 2);
        writer.add_bits(0xff, 2);
        assert_eq!(writer.finish(), [0b11001]);
    }

    #[test]
    fn reader_sees_written_fields() {
        let fields = [(5u32, 3u8), (0, 0), (1, 1), (300, 9), (0xdead_beef, 32), (2, 2)];
        let mut writer = BitWriter::new();
        for &(v, n) in &fields {
            writer.add_bits(v, n);
        }
        let data = writer.finish();

        let mut reader = BitReader::new(&data, 0);
        for &(v, n) in &fields {
            assert_eq!(reader.read_bits(n).unwrap(), v);
        }
        assert_eq!(reader.bytes_consumed(), data.len());
    }
}
