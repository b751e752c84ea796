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

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::dic::article::variant_code;
use crate::dic::build::error::{BuildFailure, DicCompilationCtx};
use crate::dic::pos;
use crate::dic::trie::TERMINATOR;
use crate::prelude::*;

/// Entry as it appears in the source lexicon
#[derive(Deserialize, Debug)]
pub(crate) struct RawEntry {
    #[serde(rename = "Latn")]
    latin: String,
    #[serde(rename = "Shaw")]
    shavian: String,
    pos: String,
    #[serde(default)]
    ipa: Option<String>,
    #[serde(default)]
    var: Option<String>,
}

/// Articles keyed by name, in file order
pub(crate) type RawLexicon = IndexMap<String, Vec<RawEntry>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub headword: String,
    pub rendering: String,
    /// Word type of the first part of the tag
    pub word_type: u8,
    /// Word types of every part of the tag
    pub pos: Vec<u8>,
    pub ipa: String,
    pub variant: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconArticle {
    pub key: String,
    pub entries: Vec<LexiconEntry>,
}

pub(crate) struct LexiconReader {
    articles: Vec<LexiconArticle>,
    ctx: DicCompilationCtx,
}

fn is_base_verb(tag: &str) -> bool {
    tag == "VVB" || tag == "VVI"
}

fn check_word(word: &str) -> Result<(), BuildFailure> {
    if word.is_empty() || word.contains(TERMINATOR) {
        return Err(BuildFailure::InvalidWord(word.to_owned()));
    }
    Ok(())
}

impl LexiconReader {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            ctx: DicCompilationCtx::default(),
        }
    }

    pub fn articles(&self) -> &[LexiconArticle] {
        &self.articles
    }

    /// Reads a lexicon file, returning the number of entries kept
    pub fn read_file(&mut self, path: &Path) -> PocketResult<usize> {
        let file = File::open(path)
            .map_err(|e| PocketError::from(e).with_context(path.to_string_lossy()))?;
        let old_name = self.ctx.set_filename(path.to_string_lossy().into_owned());
        let result = match serde_json::from_reader(BufReader::new(file)) {
            Ok(raw) => self.read_raw(raw),
            Err(e) => self.ctx.err(e),
        };
        self.ctx.set_filename(old_name);
        result
    }

    pub fn read_bytes(&mut self, data: &[u8]) -> PocketResult<usize> {
        match serde_json::from_slice(data) {
            Ok(raw) => self.read_raw(raw),
            Err(e) => self.ctx.err(e),
        }
    }

    fn read_raw(&mut self, raw: RawLexicon) -> PocketResult<usize> {
        let total = self.articles.len() + raw.len();
        if total > u16::MAX as usize + 1 {
            return self.ctx.err(BuildFailure::TooManyArticles(total));
        }

        // nothing is kept from a lexicon that fails partway
        let mut articles = Vec::with_capacity(raw.len());
        let mut kept = 0;
        for (key, entries) in raw {
            self.ctx.set_article(key.as_str());
            match self.read_article(key, entries) {
                Ok(article) => {
                    kept += article.entries.len();
                    articles.push(article);
                }
                Err(e) => {
                    self.ctx.set_article("");
                    return Err(e);
                }
            }
        }
        self.ctx.set_article("");
        self.articles.append(&mut articles);

        Ok(kept)
    }

    fn read_article(&self, key: String, raw: Vec<RawEntry>) -> PocketResult<LexiconArticle> {
        let mut entries = Vec::with_capacity(raw.len());
        let mut had_verb = false;

        for e in raw {
            // the base form and the infinitive are shown as one verb
            if is_base_verb(&e.pos) {
                if had_verb {
                    continue;
                }
                had_verb = true;
            }

            check_word(&e.latin).map_err(|f| self.ctx.to_pocket_err(f))?;
            check_word(&e.shavian).map_err(|f| self.ctx.to_pocket_err(f))?;

            let pos = match pos::word_types(&e.pos) {
                Ok(p) => p,
                Err(_) => {
                    return self.ctx.err(BuildFailure::UnknownPartOfSpeech {
                        tag: e.pos,
                        headword: e.latin,
                        rendering: e.shavian,
                    })
                }
            };

            entries.push(LexiconEntry {
                headword: e.latin,
                rendering: e.shavian,
                word_type: pos[0],
                pos,
                ipa: e.ipa.unwrap_or_default(),
                variant: variant_code(e.var.as_deref()),
            });
        }

        Ok(LexiconArticle { key, entries })
    }
}
