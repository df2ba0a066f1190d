use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const DEFAULT_CONFIG_FILE: &str = "seeder.toml";
const ENV_PREFIX: &str = "SEEDER";
const INDEX_PLACEHOLDER: &str = "{index}";

/// Everything a run needs. Passed explicitly through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Number of listing pages; files are indexed `0..file_count`.
    pub file_count: usize,
    /// Minimum `num_favorers` for a listing to survive the popularity filter.
    pub like_threshold: u64,
    /// Exact number of items drawn into the seed set.
    pub sample_size: usize,
    /// How many leading ids of a category path are kept (K).
    pub category_path_depth: usize,
    /// Listing path template; `{index}` is replaced by the zero-padded page index.
    pub input_pattern: String,
    /// Zero-padding width for `{index}`.
    pub index_width: usize,
    pub ban_list_path: PathBuf,
    pub cache_path: PathBuf,
    pub categories_path: PathBuf,
    pub output_items_path: PathBuf,
    pub output_categories_path: PathBuf,
    /// Emit `num_favorers` on each exported item.
    pub include_favorers: bool,
    /// Fixed RNG seed for reproducible samples.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            file_count: 286,
            like_threshold: 500,
            sample_size: 1000,
            category_path_depth: 3,
            input_pattern: "./data_input/listings/{index}.json".to_string(),
            index_width: 4,
            ban_list_path: PathBuf::from("./data_input/banned_words.txt"),
            cache_path: PathBuf::from("./data_intermediate/top_items.json"),
            categories_path: PathBuf::from("./data_input/categories.json"),
            output_items_path: PathBuf::from("./data_output/items.json"),
            output_categories_path: PathBuf::from("./data_output/categories.json"),
            include_favorers: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Layer compiled-in defaults, an optional TOML file and `SEEDER_*` env vars.
    pub fn load(file: &Path) -> Result<Self, PipelineError> {
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let settings: Settings = Config::builder()
            .add_source(defaults)
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.file_count == 0 {
            return Err(PipelineError::Config("file_count must be at least 1".into()));
        }
        if self.sample_size == 0 {
            return Err(PipelineError::Config("sample_size must be at least 1".into()));
        }
        if self.category_path_depth == 0 {
            return Err(PipelineError::Config(
                "category_path_depth must be at least 1".into(),
            ));
        }
        if !self.input_pattern.contains(INDEX_PLACEHOLDER) {
            return Err(PipelineError::Config(format!(
                "input_pattern {:?} has no {} placeholder",
                self.input_pattern, INDEX_PLACEHOLDER
            )));
        }
        Ok(())
    }

    /// Path of listing page `index`, e.g. `./data_input/listings/0007.json`.
    pub fn listing_path(&self, index: usize) -> PathBuf {
        let padded = format!("{:0width$}", index, width = self.index_width);
        PathBuf::from(self.input_pattern.replace(INDEX_PLACEHOLDER, &padded))
    }
}

fn config_err(e: ::config::ConfigError) -> PipelineError {
    PipelineError::Config(e.to_string())
}
