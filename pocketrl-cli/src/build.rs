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

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use structopt::StructOpt;

use pocketrl::config::Config;
use pocketrl::dic::build::report::DictPartReport;
use pocketrl::dic::build::DictBuilder;

#[derive(StructOpt)]
pub struct BuildCmd {
    /// Input lexicon files in JSON format
    #[structopt(short = "i", long = "input", required = true, parse(from_os_str))]
    inputs: Vec<PathBuf>,

    /// Where to place compiled dictionary.
    /// If there was an existing one it will be overwritten.
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output_file: PathBuf,

    /// Directory for the article pages.
    /// Articles are not written if not present.
    #[structopt(long = "articles", parse(from_os_str))]
    article_dir: Option<PathBuf>,
}

pub fn build_main(cmd: BuildCmd, config: &Config) {
    let mut builder = DictBuilder::new();
    for d in cmd.inputs.iter() {
        builder
            .read_lexicon(d.as_path())
            .unwrap_or_else(|e| panic!("failed to read {:?}\n{}", d, e));
    }

    let file = output_file(&cmd.output_file);
    let mut buf_writer = BufWriter::with_capacity(16 * 1024, file);
    builder
        .compile(&mut buf_writer)
        .unwrap_or_else(|e| panic!("failed to compile dictionary\n{}", e));
    buf_writer.flush().expect("failed to flush");

    if let Some(dir) = &cmd.article_dir {
        builder
            .write_articles(dir, config.article_page_capacity)
            .unwrap_or_else(|e| panic!("failed to write articles to {:?}\n{}", dir, e));
    }

    print_stats(builder.report());
}

fn print_stats(report: &[DictPartReport]) {
    let max_len = report.iter().map(|r| r.part().len()).max().unwrap_or(0);

    for part in report {
        let unit = if part.is_write() { "bytes" } else { "entries" };
        eprintln!(
            "{0:1$} {2} {3} in {4:.3} sec",
            part.part(),
            max_len,
            part.size(),
            unit,
            part.time().as_secs_f32()
        )
    }
}

fn output_file(p: &Path) -> File {
    if p.exists() {
        std::fs::remove_file(p).unwrap_or_else(|e| panic!("failed to delete {:?}\n{:?}", p, e));
    }

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(p)
        .unwrap_or_else(|e| panic!("failed to open {:?} for writing:\n{:?}", p, e))
}
