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

mod build;
mod output;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use pocketrl::config::Config;
use pocketrl::dic::article::{load_article, ArticleRef};
use pocketrl::dic::path::Senses;
use pocketrl::prelude::*;
use pocketrl::transliteration::transliterate;

use crate::output::{SearchOutput, Writer};

/// Spelling dictionary lookup and transliteration
#[derive(StructOpt)]
#[structopt(name = "pocketrl")]
struct Cli {
    /// Path to the setting file in JSON format
    #[structopt(short = "r", long = "config-file", parse(from_os_str))]
    config_file: Option<PathBuf>,

    /// Path to the root directory of resources
    #[structopt(short = "p", long = "resource-dir", parse(from_os_str))]
    resource_dir: Option<PathBuf>,

    /// Path to the dictionary.
    /// If None, it refers to the config and then the resource directory
    #[structopt(short = "l", long = "dict", parse(from_os_str))]
    dictionary_path: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Lists the words starting with a prefix
    Search {
        /// Words of the prefix, joined by single spaces
        #[structopt(required = true)]
        query: Vec<String>,

        /// Maximum number of results, the configured limit if not present
        #[structopt(short = "n", long = "max-results")]
        max_results: Option<usize>,

        /// Searches the prefix exactly as given, without normalization
        #[structopt(long)]
        raw: bool,

        /// Prints the results as JSON
        #[structopt(long)]
        json: bool,
    },

    /// Transliterates text word by word
    Transliterate {
        /// Input text file: If not present, read from STDIN
        #[structopt(parse(from_os_str))]
        file: Option<PathBuf>,
    },

    /// Builds a dictionary from JSON lexicons
    Build(build::BuildCmd),

    /// Prints every word of a dictionary with its senses
    Dump {
        /// Dictionary to dump, the configured one if not present
        #[structopt(parse(from_os_str))]
        dict: Option<PathBuf>,
    },

    /// Prints one article
    Article {
        /// Article number
        article: u16,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("pocketrl=warn".parse().unwrap()),
        )
        .init();

    let args: Cli = Cli::from_args();

    // load config file
    let config = Config::new(
        args.config_file.clone(),
        args.resource_dir.clone(),
        args.dictionary_path.clone(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Failed to load config file: {}", e);
        process::exit(1);
    });

    let mut writer: Writer = BufWriter::new(Box::new(io::stdout()));

    let result = match args.command {
        Command::Build(cmd) => {
            build::build_main(cmd, &config);
            Ok(())
        }
        Command::Search {
            query,
            max_results,
            raw,
            json,
        } => {
            let dict = load_dictionary(config.dictionary.clone());
            let prefix = query.join(" ");
            let prefix = if raw { prefix } else { normalize_query(&prefix) };
            let format: Box<dyn SearchOutput> = if json {
                Box::new(output::Json)
            } else {
                Box::new(output::Simple)
            };
            dict.search(&prefix, max_results.unwrap_or(config.max_results))
                .and_then(|results| format.write(&mut writer, &results))
        }
        Command::Transliterate { file } => {
            let dict = load_dictionary(config.dictionary.clone());
            let reader: Box<dyn BufRead> = match &file {
                Some(input_path) => Box::new(BufReader::new(
                    File::open(input_path)
                        .unwrap_or_else(|_| panic!("Failed to open input file {:?}", input_path)),
                )),
                None => Box::new(BufReader::new(io::stdin())),
            };
            transliterate_lines(&dict, reader, &mut writer)
        }
        Command::Dump { dict } => {
            let dict = load_dictionary(dict.unwrap_or_else(|| config.dictionary.clone()));
            dump(&dict, &mut writer)
        }
        Command::Article { article } => load_article(
            &config.article_dir,
            ArticleRef(article),
            config.article_page_capacity,
        )
        .and_then(|a| output::write_article(&mut writer, &a)),
    };

    if let Err(e) = result.and_then(|_| writer.flush().map_err(PocketError::from)) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn load_dictionary(path: PathBuf) -> Dictionary {
    Dictionary::load(&path).unwrap_or_else(|e| {
        eprintln!("Failed to load dictionary: {}", e);
        process::exit(1);
    })
}

fn transliterate_lines(
    dict: &Dictionary,
    reader: Box<dyn BufRead>,
    writer: &mut Writer,
) -> PocketResult<()> {
    let mut out = String::new();
    for line in reader.lines() {
        let line = line?;
        out.clear();
        transliterate(dict, line.chars(), &mut out)?;
        writer.write_all(out.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn dump(dict: &Dictionary, writer: &mut Writer) -> PocketResult<()> {
    for word in dict.words() {
        let (word, payload) = word?;
        let senses = Senses::new(dict.trie(), payload).collect::<Result<Vec<_>, _>>()?;
        output::write_word(writer, &word, &senses)?;
    }
    Ok(())
}
