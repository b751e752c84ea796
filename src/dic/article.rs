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

//! Long-form articles, stored in fixed-capacity page files.
//!
//! A page file `article-XXXX.bin` holds the articles whose reference has
//! `XXXX` (in hex) as its high bits. Each article is a `u16le` byte length
//! followed by its entries.

use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};

use nom::bytes::complete::take;
use nom::number::complete::{le_u16, le_u8};
use serde::Serialize;
use tracing::debug;

use crate::dic::pos;
use crate::error::{PocketError, PocketNomError, PocketNomResult, PocketResult};

/// Articles per page in the deployed data set
pub const DEFAULT_PAGE_CAPACITY: usize = 128;

const MAX_STR_LEN: usize = u8::MAX as usize;
const MAX_ARTICLE_LEN: usize = u16::MAX as usize;

/// Index of an article
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct ArticleRef(pub u16);

impl ArticleRef {
    /// Reference of the first article stored in the same page
    pub fn page_base(self, capacity: usize) -> u16 {
        debug_assert!(capacity.is_power_of_two());
        self.0 & !((capacity - 1) as u16)
    }

    /// Position of the article inside its page
    pub fn page_index(self, capacity: usize) -> usize {
        debug_assert!(capacity.is_power_of_two());
        self.0 as usize & (capacity - 1)
    }
}

impl Display for ArticleRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path of the page file holding `article`
pub fn page_file_name<P: AsRef<Path>>(dir: P, article: ArticleRef, capacity: usize) -> PathBuf {
    dir.as_ref()
        .join(format!("article-{:04x}.bin", article.page_base(capacity)))
}

static VARIANT_CODES: [&str; 6] = ["GenAm", "GenAus", "RRP", "RRPVar", "SSB", "TrapBath"];

static VARIANT_NAMES: [&str; 6] = [
    "general American",
    "general Australian",
    "rhotic RP",
    "rhotic RP variant",
    "standard southern British",
    "trap-bath merger",
];

/// Code stored for a missing or unrecognized pronunciation variant
pub const UNKNOWN_VARIANT: u8 = u8::MAX;

/// Maps a lexicon variant label to its stored code
pub fn variant_code(label: Option<&str>) -> u8 {
    label
        .and_then(|l| VARIANT_CODES.iter().position(|&c| c == l))
        .map_or(UNKNOWN_VARIANT, |i| i as u8)
}

/// Human readable name of a variant code
pub fn variant_name(code: u8) -> &'static str {
    VARIANT_NAMES
        .get(code as usize)
        .copied()
        .unwrap_or("unknown")
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ArticleVariant {
    pub variant: u8,
    pub rendering: String,
    pub ipa: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ArticleEntry {
    pub headword: String,
    /// Word types, one for each part of a compound tag
    pub pos: Vec<u8>,
    pub variants: Vec<ArticleVariant>,
}

impl ArticleEntry {
    /// Word types joined with " + ", as shown to a reader
    pub fn pos_names(&self) -> String {
        let names: Vec<&str> = self.pos.iter().map(|&p| pos::name(p)).collect();
        names.join(" + ")
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct Article {
    pub entries: Vec<ArticleEntry>,
}

impl Article {
    /// Writes the article with its length prefix, returning the bytes written
    pub fn write_to<W: Write>(&self, w: &mut W) -> PocketResult<usize> {
        let mut body = Vec::new();
        for entry in &self.entries {
            write_str(&mut body, &entry.headword)?;
            write_u8_len(&mut body, entry.pos.len(), &entry.headword)?;
            body.extend_from_slice(&entry.pos);
            write_u8_len(&mut body, entry.variants.len(), &entry.headword)?;
            for v in &entry.variants {
                body.push(v.variant);
                write_str(&mut body, &v.rendering)?;
                write_str(&mut body, &v.ipa)?;
            }
        }

        if body.len() > MAX_ARTICLE_LEN {
            let title = self
                .entries
                .first()
                .map(|e| e.headword.clone())
                .unwrap_or_default();
            return Err(PocketError::InvalidDataFormat(MAX_ARTICLE_LEN, title));
        }

        w.write_all(&(body.len() as u16).to_le_bytes())?;
        w.write_all(&body)?;
        Ok(body.len() + 2)
    }
}

fn write_u8_len(out: &mut Vec<u8>, len: usize, owner: &str) -> PocketResult<()> {
    if len > MAX_STR_LEN {
        return Err(PocketError::InvalidDataFormat(MAX_STR_LEN, owner.to_owned()));
    }
    out.push(len as u8);
    Ok(())
}

fn write_str(out: &mut Vec<u8>, s: &str) -> PocketResult<()> {
    write_u8_len(out, s.len(), s)?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

fn str_parser(input: &[u8]) -> PocketNomResult<&[u8], String> {
    let (rest, length) = le_u8(input)?;
    let (rest, bytes) = take(length)(rest)?;
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok((rest, s.to_owned())),
        Err(_) => Err(nom::Err::Failure(PocketNomError::Utf8String)),
    }
}

fn variant_parser(input: &[u8]) -> PocketNomResult<&[u8], ArticleVariant> {
    let (rest, (variant, rendering, ipa)) =
        nom::sequence::tuple((le_u8, str_parser, str_parser))(input)?;
    Ok((
        rest,
        ArticleVariant {
            variant,
            rendering,
            ipa,
        },
    ))
}

fn entry_parser(input: &[u8]) -> PocketNomResult<&[u8], ArticleEntry> {
    let (rest, headword) = str_parser(input)?;
    let (rest, n_pos) = le_u8(rest)?;
    let (rest, pos) = take(n_pos)(rest)?;
    let (rest, n_variants) = le_u8(rest)?;
    let (rest, variants) = nom::multi::count(variant_parser, n_variants as usize)(rest)?;
    Ok((
        rest,
        ArticleEntry {
            headword,
            pos: pos.to_vec(),
            variants,
        },
    ))
}

fn article_body_parser(input: &[u8]) -> PocketNomResult<&[u8], &[u8]> {
    let (rest, length) = le_u16(input)?;
    take(length)(rest)
}

fn article_parser(input: &[u8]) -> PocketNomResult<&[u8], Article> {
    let (rest, body) = article_body_parser(input)?;
    let (_, entries) =
        nom::combinator::all_consuming(nom::multi::many0(entry_parser))(body)?;
    Ok((rest, Article { entries }))
}

/// A page of articles
pub struct ArticlePage<'a> {
    data: &'a [u8],
}

impl<'a> ArticlePage<'a> {
    pub fn new(data: &'a [u8]) -> ArticlePage<'a> {
        ArticlePage { data }
    }

    /// Decodes the article at `index` in this page, if the page has one
    pub fn article(&self, index: usize) -> PocketResult<Option<Article>> {
        let mut input = self.data;
        for _ in 0..index {
            if input.is_empty() {
                return Ok(None);
            }
            let (rest, _) = article_body_parser(input)?;
            input = rest;
        }

        if input.is_empty() {
            return Ok(None);
        }

        let (_, article) = article_parser(input)?;
        Ok(Some(article))
    }

    /// Number of articles stored in the page
    pub fn len(&self) -> PocketResult<usize> {
        let mut input = self.data;
        let mut count = 0;
        while !input.is_empty() {
            let (rest, _) = article_body_parser(input)?;
            input = rest;
            count += 1;
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reads one article from the page files in `dir`
pub fn load_article<P: AsRef<Path>>(
    dir: P,
    article: ArticleRef,
    capacity: usize,
) -> PocketResult<Article> {
    let path = page_file_name(dir, article, capacity);
    debug!(path = %path.display(), article = article.0, "reading article page");

    let data = match std::fs::read(&path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PocketError::ArticleNotFound(article.0))
        }
        Err(e) => {
            return Err(PocketError::from(e).with_context(path.to_string_lossy()));
        }
    };

    ArticlePage::new(&data)
        .article(article.page_index(capacity))?
        .ok_or(PocketError::ArticleNotFound(article.0))
}
