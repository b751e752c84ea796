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

//! Compiles a JSON lexicon into a dictionary and its article pages.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use tracing::info;

use crate::config::ConfigError;
use crate::dic::article::{page_file_name, Article, ArticleEntry, ArticleRef, ArticleVariant};
use crate::dic::build::error::DicCompilationCtx;
use crate::dic::build::lexicon::LexiconEntry;
use crate::dic::build::report::{DictPartReport, ReportBuilder, Reporter};
use crate::dic::build::trie_builder::TrieBuilder;
use crate::error::{PocketError, PocketResult};

mod bit_writer;
pub mod error;
pub(crate) mod lexicon;
pub mod report;
mod trie_builder;
#[cfg(test)]
mod test;

pub enum DataSource<'a> {
    File(&'a Path),
    Data(&'a [u8]),
}

pub trait AsDataSource<'a> {
    fn convert(self) -> DataSource<'a>;
    fn name(&self) -> String;
}

impl<'a> AsDataSource<'a> for DataSource<'a> {
    fn convert(self) -> DataSource<'a> {
        self
    }

    fn name(&self) -> String {
        match self {
            DataSource::File(p) => p.to_string_lossy().into_owned(),
            DataSource::Data(d) => format!("memory ({} bytes)", d.len()),
        }
    }
}

impl<'a> AsDataSource<'a> for &'a Path {
    fn convert(self) -> DataSource<'a> {
        DataSource::File(self)
    }
    fn name(&self) -> String {
        self.to_string_lossy().into_owned()
    }
}

impl<'a> AsDataSource<'a> for &'a [u8] {
    fn convert(self) -> DataSource<'a> {
        DataSource::Data(self)
    }
    fn name(&self) -> String {
        format!("memory ({} bytes)", self.len())
    }
}

/// Builds a binary dictionary and its article pages from JSON lexicons
pub struct DictBuilder {
    lexicon: lexicon::LexiconReader,
    ctx: DicCompilationCtx,
    reporter: Reporter,
}

impl Default for DictBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DictBuilder {
    pub fn new() -> Self {
        let mut ctx = DicCompilationCtx::default();
        ctx.set_filename("<entries>".to_owned());
        Self {
            lexicon: lexicon::LexiconReader::new(),
            ctx,
            reporter: Reporter::new(),
        }
    }

    /// Read a JSON lexicon from either a file or an in-memory buffer.
    ///
    /// Articles are numbered in reading order, across all lexicons read.
    /// Returns the number of entries kept.
    pub fn read_lexicon<'a, T: AsDataSource<'a> + 'a>(&mut self, data: T) -> PocketResult<usize> {
        let report = ReportBuilder::new(data.name()).read();
        let result = match data.convert() {
            DataSource::File(p) => self.lexicon.read_file(p),
            DataSource::Data(d) => self.lexicon.read_bytes(d),
        };
        self.reporter.collect_r(result, report)
    }

    /// Number of articles read so far
    pub fn n_articles(&self) -> usize {
        self.lexicon.articles().len()
    }

    /// Compile the binary dictionary and write it to the specified sink.
    ///
    /// Returns the number of bytes written.
    pub fn compile<W: Write>(&mut self, w: &mut W) -> PocketResult<usize> {
        let report = ReportBuilder::new("index").read();
        let trie = self.build_trie()?;
        self.reporter.collect(trie.n_senses(), report);

        let report = ReportBuilder::new("trie");
        let written = trie.write_to(w).map_err(|e| self.ctx.to_pocket_err(e))?;
        self.reporter.collect(written, report);

        info!(
            senses = trie.n_senses(),
            nodes = trie.n_nodes(),
            size = written,
            "compiled dictionary"
        );
        Ok(written)
    }

    /// Write the article pages into `dir`, creating it if needed.
    ///
    /// `capacity` articles share one page file. Returns the number of bytes
    /// written over all pages.
    pub fn write_articles<P: AsRef<Path>>(&mut self, dir: P, capacity: usize) -> PocketResult<usize> {
        if !capacity.is_power_of_two() || capacity > u16::MAX as usize + 1 {
            return Err(ConfigError::InvalidFormat(format!(
                "article page capacity {} is not a power of two up to 65536",
                capacity
            ))
            .into());
        }

        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| PocketError::from(e).with_context(dir.to_string_lossy()))?;

        let report = ReportBuilder::new("articles");
        let mut size = 0;
        let mut n_pages = 0;

        for (page, articles) in self.lexicon.articles().chunks(capacity).enumerate() {
            let base = ArticleRef((page * capacity) as u16);
            let path = page_file_name(dir, base, capacity);
            let file = File::create(&path)
                .map_err(|e| PocketError::from(e).with_context(path.to_string_lossy()))?;
            let mut w = BufWriter::new(file);

            for article in articles {
                self.ctx.set_article(article.key.as_str());
                size += make_article(&article.entries).write_to(&mut w)?;
            }
            w.flush()?;
            n_pages += 1;
        }
        self.ctx.set_article("");

        self.reporter.collect(size, report);
        info!(dir = %dir.display(), pages = n_pages, size, "wrote article pages");
        Ok(size)
    }

    /// Return dictionary build report
    pub fn report(&self) -> &[DictPartReport] {
        self.reporter.reports()
    }
}

// private functions
impl DictBuilder {
    fn build_trie(&mut self) -> PocketResult<TrieBuilder> {
        let mut trie = TrieBuilder::new();

        for (i, article) in self.lexicon.articles().iter().enumerate() {
            self.ctx.set_article(article.key.as_str());
            for e in &article.entries {
                trie.add_word(&e.headword, &e.rendering, e.word_type, i as u16)
                    .map_err(|f| self.ctx.to_pocket_err(f))?;
            }
        }
        self.ctx.set_article("");

        Ok(trie)
    }
}

/// Groups consecutive entries with the same headword and tags as variants
fn make_article(entries: &[LexiconEntry]) -> Article {
    let groups = entries
        .iter()
        .group_by(|e| (e.headword.as_str(), e.pos.as_slice()));

    let entries = groups
        .into_iter()
        .map(|((headword, pos), group)| ArticleEntry {
            headword: headword.to_owned(),
            pos: pos.to_vec(),
            variants: group
                .map(|e| ArticleVariant {
                    variant: e.variant,
                    rendering: e.rendering.clone(),
                    ipa: e.ipa.clone(),
                })
                .collect(),
        })
        .collect();

    Article { entries }
}
