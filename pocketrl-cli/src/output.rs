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

use std::io::{BufWriter, Write};

use pocketrl::dic::article::{variant_name, Article};
use pocketrl::dic::path::Sense;
use pocketrl::prelude::*;

pub type Writer = BufWriter<Box<dyn Write>>;

pub trait SearchOutput {
    fn write(&self, writer: &mut Writer, results: &[SearchResult]) -> PocketResult<()>;
}

/// One tab separated line per result
pub struct Simple;

impl SearchOutput for Simple {
    fn write(&self, writer: &mut Writer, results: &[SearchResult]) -> PocketResult<()> {
        for r in results {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                r.word,
                r.translation,
                r.pos_name(),
                r.article
            )?;
        }
        Ok(())
    }
}

/// A JSON array of results
pub struct Json;

impl SearchOutput for Json {
    fn write(&self, writer: &mut Writer, results: &[SearchResult]) -> PocketResult<()> {
        serde_json::to_writer(&mut *writer, results)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Writes a headword followed by its senses, as in `car (17, 0, 𐑒𐑸)`
pub fn write_word(writer: &mut Writer, word: &str, senses: &[Sense]) -> PocketResult<()> {
    writer.write_all(word.as_bytes())?;
    for s in senses {
        write!(
            writer,
            " ({}, {}, {})",
            s.word_type, s.article, s.rendering
        )?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

pub fn write_article(writer: &mut Writer, article: &Article) -> PocketResult<()> {
    for entry in &article.entries {
        writeln!(writer, "{}\t{}", entry.headword, entry.pos_names())?;
        for v in &entry.variants {
            writeln!(
                writer,
                "\t{}\t/{}/\t{}",
                v.rendering,
                v.ipa,
                variant_name(v.variant)
            )?;
        }
    }
    Ok(())
}
