use std::fs::File;
use std::io::BufReader;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::PipelineError;
use crate::pipeline::filter::is_popular;
use crate::records::RawListing;

/// Decode listing page `index`.
pub fn read_page(settings: &Settings, index: usize) -> Result<Vec<RawListing>, PipelineError> {
    let path = settings.listing_path(index);
    let source_err = |reason: String| PipelineError::SourceRead {
        index,
        path: path.clone(),
        reason,
    };
    let file = File::open(&path).map_err(|e| source_err(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| source_err(e.to_string()))
}

/// Read every page and keep only popular listings.
///
/// Pages are processed in parallel; the result is concatenated in page order.
pub fn collect_popular(settings: &Settings) -> Result<Vec<RawListing>, PipelineError> {
    let n = settings.file_count;
    info!(files = n, threshold = settings.like_threshold, "Scanning listing pages");

    let pb = ProgressBar::new(n as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let pages: Vec<Vec<RawListing>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let listings = read_page(settings, i)?;
            let total = listings.len();
            let kept: Vec<RawListing> = listings
                .into_iter()
                .filter(|l| is_popular(l, settings.like_threshold))
                .collect();
            debug!(page = i, of = n, kept = kept.len(), total, "page done");
            pb.inc(1);
            Ok(kept)
        })
        .collect::<Result<_, PipelineError>>()?;
    pb.finish_and_clear();

    let popular: Vec<RawListing> = pages.into_iter().flatten().collect();
    info!(kept = popular.len(), "Popular listings collected");
    Ok(popular)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    /// Write pages `0000.json..` under `dir`, one page per favorer list.
    pub(crate) fn write_pages(dir: &Path, pages: &[&[u64]]) -> Settings {
        let listings_dir = dir.join("listings");
        std::fs::create_dir_all(&listings_dir).unwrap();
        let mut next_id = 0;
        for (i, favorers) in pages.iter().enumerate() {
            let rows: Vec<_> = favorers
                .iter()
                .map(|f| {
                    next_id += 1;
                    let who_made = if next_id % 2 == 0 { "i_did" } else { "someone_else" };
                    json!({
                        "listing_id": next_id,
                        "title": format!("Listing {}", next_id),
                        "description": "A fine thing",
                        "price": "10.00",
                        "num_favorers": f,
                        "who_made": who_made,
                        "category_path_ids": [1, 10 + next_id, 100 + next_id, 1000 + next_id],
                        "materials": ["wood"],
                        "Images": [{
                            "url_75x75": "s",
                            "url_170x135": "m",
                            "url_570xN": "l",
                            "url_fullxfull": "xl",
                            "hex_code": "FFFFFF"
                        }]
                    })
                })
                .collect();
            let path = listings_dir.join(format!("{:04}.json", i));
            std::fs::write(path, serde_json::to_string(&rows).unwrap()).unwrap();
        }
        Settings {
            file_count: pages.len(),
            input_pattern: format!("{}/{{index}}.json", listings_dir.display()),
            ban_list_path: dir.join("banned_words.txt"),
            cache_path: dir.join("intermediate/top_items.json"),
            categories_path: dir.join("categories.json"),
            output_items_path: dir.join("out/items.json"),
            output_categories_path: dir.join("out/categories.json"),
            ..Settings::default()
        }
    }

    #[test]
    fn popular_listings_in_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let settings = write_pages(dir.path(), &[&[100, 600, 500], &[700, 10, 500]]);
        let popular = collect_popular(&settings).unwrap();
        let favorers: Vec<u64> = popular.iter().map(|l| l.num_favorers).collect();
        assert_eq!(favorers, vec![600, 500, 700, 500]);
    }

    #[test]
    fn filter_is_sound_and_complete() {
        let dir = tempfile::tempdir().unwrap();
        let pages: &[&[u64]] = &[&[0, 499, 500, 501], &[1_000_000], &[]];
        let settings = write_pages(dir.path(), pages);
        let popular = collect_popular(&settings).unwrap();
        assert!(popular.iter().all(|l| l.num_favorers >= 500));
        let expected = pages.iter().flat_map(|p| p.iter()).filter(|f| **f >= 500).count();
        assert_eq!(popular.len(), expected);
    }

    #[test]
    fn missing_page_names_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = write_pages(dir.path(), &[&[600]]);
        settings.file_count = 2;
        match collect_popular(&settings) {
            Err(PipelineError::SourceRead { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected SourceRead, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn malformed_page_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = write_pages(dir.path(), &[&[600]]);
        std::fs::write(settings.listing_path(0), "{\"not\": \"an array\"}").unwrap();
        assert!(matches!(
            read_page(&settings, 0),
            Err(PipelineError::SourceRead { index: 0, .. })
        ));
    }
}
