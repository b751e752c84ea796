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

//! Word-by-word rewriting of free text through the dictionary.

use std::fmt::Write;
use std::iter::Peekable;

use crate::dic::path::decode_sense;
use crate::dic::trie::Trie;
use crate::prelude::*;

/// Punctuation kept inside a word when followed by a letter
fn is_joiner(ch: char) -> bool {
    matches!(ch, '\'' | '-' | '’')
}

struct Transliterator<'a, I: Iterator<Item = char>, W: Write> {
    trie: Trie<'a>,
    input: Peekable<I>,
    output: &'a mut W,
    word: String,
}

impl<'a, I: Iterator<Item = char>, W: Write> Transliterator<'a, I, W> {
    fn flush_word(&mut self) -> PocketResult<()> {
        if self.word.is_empty() {
            return Ok(());
        }

        match self.trie.find_word(&self.word)? {
            Some(pos) => {
                let sense = decode_sense(self.trie, pos)?;
                self.output.write_str(&sense.rendering)?;
            }
            None => self.output.write_str(&self.word)?,
        }

        self.word.clear();
        Ok(())
    }

    fn run(&mut self) -> PocketResult<()> {
        while let Some(ch) = self.input.next() {
            if ch.is_alphabetic() {
                self.word.extend(ch.to_lowercase());
                continue;
            }

            if !self.word.is_empty() && is_joiner(ch) {
                if let Some(next) = self.input.peek() {
                    if next.is_alphabetic() {
                        self.word.push(if ch == '’' { '\'' } else { ch });
                        continue;
                    }
                }
            }

            self.flush_word()?;
            self.output.write_char(ch)?;
        }

        self.flush_word()
    }
}

/// Rewrites every word of `input` with the first rendering of its headword.
///
/// Words are runs of letters, lower-cased, possibly joined by apostrophes or
/// hyphens. Words missing from the dictionary are written lower-cased. All
/// other characters are copied through.
pub fn transliterate<I, W>(dict: &Dictionary, input: I, output: &mut W) -> PocketResult<()>
where
    I: IntoIterator<Item = char>,
    W: Write,
{
    Transliterator {
        trie: dict.trie(),
        input: input.into_iter().peekable(),
        output,
        word: String::new(),
    }
    .run()
}

/// Transliterates `text` into a new string
pub fn transliterate_str(dict: &Dictionary, text: &str) -> PocketResult<String> {
    let mut result = String::with_capacity(text.len());
    transliterate(dict, text.chars(), &mut result)?;
    Ok(result)
}
