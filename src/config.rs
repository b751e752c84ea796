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

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dic::article::DEFAULT_PAGE_CAPACITY;

const DEFAULT_RESOURCE_DIR: &str = "resources";
const DEFAULT_DICTIONARY_FILE: &str = "dictionary.bin";
const DEFAULT_ARTICLE_DIR: &str = "articles";
pub const DEFAULT_MAX_RESULTS: usize = 128;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Setting data loaded from config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub resource_dir: PathBuf,
    pub dictionary: PathBuf,
    pub article_dir: PathBuf,
    pub article_page_capacity: usize,
    pub max_results: usize,
}

/// Struct corresponds with raw config json file.
/// You must use filed names defined here as json object key.
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    resourcePath: Option<PathBuf>,
    dictionary: Option<PathBuf>,
    articleDir: Option<PathBuf>,
    articlePageCapacity: Option<usize>,
    maxResults: Option<usize>,
}

impl RawConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        let resource_dir = PathBuf::from(DEFAULT_RESOURCE_DIR);
        Config {
            dictionary: resource_dir.join(DEFAULT_DICTIONARY_FILE),
            article_dir: resource_dir.join(DEFAULT_ARTICLE_DIR),
            resource_dir,
            article_page_capacity: DEFAULT_PAGE_CAPACITY,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Config {
    /// Builds the configuration.
    ///
    /// Arguments take priority over the config file, which takes priority
    /// over the defaults. Without a config file only arguments and defaults
    /// are used.
    pub fn new(
        config_file: Option<PathBuf>,
        resource_dir: Option<PathBuf>,
        dictionary_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let raw_config = match config_file {
            Some(path) => RawConfig::from_file(path)?,
            None => RawConfig::default(),
        };
        Config::from_raw(raw_config, resource_dir, dictionary_path)
    }

    pub fn from_raw(
        raw_config: RawConfig,
        resource_dir: Option<PathBuf>,
        dictionary_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        // prioritize arg (cli option) > config file > default
        let resource_dir = resource_dir
            .or(raw_config.resourcePath)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_DIR));

        // an explicit dictionary path is used as given
        let dictionary = match dictionary_path {
            Some(p) => p,
            None => Config::join_if_relative(
                &resource_dir,
                raw_config
                    .dictionary
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DICTIONARY_FILE)),
            ),
        };

        let article_dir = Config::join_if_relative(
            &resource_dir,
            raw_config
                .articleDir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTICLE_DIR)),
        );

        let article_page_capacity = raw_config
            .articlePageCapacity
            .unwrap_or(DEFAULT_PAGE_CAPACITY);
        if !article_page_capacity.is_power_of_two() || article_page_capacity > 1 << 16 {
            return Err(ConfigError::InvalidFormat(format!(
                "articlePageCapacity must be a power of two up to 65536, got {}",
                article_page_capacity
            )));
        }

        Ok(Config {
            resource_dir,
            dictionary,
            article_dir,
            article_page_capacity,
            max_results: raw_config.maxResults.unwrap_or(DEFAULT_MAX_RESULTS),
        })
    }

    fn join_if_relative(resource_dir: &Path, file_path: PathBuf) -> PathBuf {
        if file_path.is_absolute() {
            file_path
        } else {
            resource_dir.join(&file_path)
        }
    }
}
