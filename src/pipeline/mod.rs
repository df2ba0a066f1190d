pub mod categories;
pub mod extract;
pub mod filter;
pub mod sample;

use tracing::info;

use crate::cache::{self, CacheOutcome};
use crate::config::Settings;
use crate::error::PipelineError;
use crate::export;
use crate::records::RawListing;
use crate::source;
use extract::ExtractOptions;
use filter::BanList;

/// Counts reported after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cache: CacheOutcome,
    pub popular: usize,
    pub banned: usize,
    pub skipped: usize,
    pub extracted: usize,
    pub sampled: usize,
    pub categories: usize,
}

impl RunSummary {
    pub fn print(&self, settings: &Settings) {
        match self.cache {
            CacheOutcome::Hit => println!("Intermediate cache: hit ({:?})", settings.cache_path),
            CacheOutcome::Built => println!(
                "Intermediate cache: built from {} pages ({:?})",
                settings.file_count, settings.cache_path
            ),
        }
        println!("Popular listings:  {}", self.popular);
        println!("Banned:            {}", self.banned);
        println!("No category path:  {}", self.skipped);
        println!("Extracted:         {}", self.extracted);
        println!(
            "Sampled:           {} -> {:?}",
            self.sampled, settings.output_items_path
        );
        println!(
            "Categories:        {} -> {:?}",
            self.categories, settings.output_categories_path
        );
    }
}

/// Popular listings, from the snapshot when one exists.
pub fn popular_listings(settings: &Settings) -> Result<(Vec<RawListing>, CacheOutcome), PipelineError> {
    cache::load_or_build(&settings.cache_path, || source::collect_popular(settings))
}

/// Reader -> popularity -> cache -> content filter -> extract -> sample ->
/// categories -> export.
///
/// Nothing is written to the output paths unless every stage succeeds.
pub fn run(settings: &Settings) -> Result<RunSummary, PipelineError> {
    settings.validate()?;

    let (popular, cache) = popular_listings(settings)?;
    let popular_count = popular.len();

    let bans = BanList::load(&settings.ban_list_path);
    let clean = filter::remove_banned(popular, &bans);
    let banned = popular_count - clean.len();

    let opts = ExtractOptions {
        category_path_depth: settings.category_path_depth,
        include_favorers: settings.include_favorers,
    };
    let (items, skipped) = extract::extract_all(&clean, &opts);
    let extracted = items.len();
    info!(extracted, skipped, depth = settings.category_path_depth, "Fields extracted");

    let mut rng = sample::make_rng(settings.seed);
    let sampled = sample::sample(items, settings.sample_size, &mut rng)?;
    info!(sampled = sampled.len(), seed = ?settings.seed, "Sample drawn");

    let reference = categories::load_reference(&settings.categories_path)?;
    let resolved = categories::resolve(&sampled, &reference);
    info!(categories = resolved.len(), reference = reference.len(), "Categories resolved");

    export::write_records(&settings.output_items_path, &sampled)?;
    export::write_records(&settings.output_categories_path, &resolved)?;

    Ok(RunSummary {
        cache,
        popular: popular_count,
        banned,
        skipped,
        extracted,
        sampled: sampled.len(),
        categories: resolved.len(),
    })
}
