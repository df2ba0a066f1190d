use rayon::prelude::*;
use tracing::warn;

use crate::records::{ExtractedItem, ImageDescriptor, RawListing};

/// Resolution keys kept on each image.
pub const IMAGE_KEYS: [&str; 4] = ["url_75x75", "url_170x135", "url_570xN", "url_fullxfull"];

/// `who_made` value marking a listing as made by the seller.
pub const HANDMADE_MARKER: &str = "i_did";

pub struct ExtractOptions {
    pub category_path_depth: usize,
    pub include_favorers: bool,
}

/// Project a listing onto the export shape. `None` if it has no category path.
pub fn extract(listing: &RawListing, opts: &ExtractOptions) -> Option<ExtractedItem> {
    let path = truncate_path(&listing.category_path_ids, opts.category_path_depth);
    let category_id = *path.last()?;
    Some(ExtractedItem {
        title: listing.title.clone(),
        description: listing.description.clone(),
        price: listing.price,
        category_path_ids: path,
        category_id,
        materials: listing.materials.clone(),
        images: listing.images.iter().map(reduce_image).collect(),
        handmade: listing.who_made.as_deref() == Some(HANDMADE_MARKER),
        num_favorers: opts.include_favorers.then_some(listing.num_favorers),
    })
}

/// Extract every listing, preserving order. Returns the items and how many
/// listings were skipped for lacking a category path.
pub fn extract_all(listings: &[RawListing], opts: &ExtractOptions) -> (Vec<ExtractedItem>, usize) {
    let items: Vec<ExtractedItem> = listings
        .par_iter()
        .filter_map(|l| {
            let item = extract(l, opts);
            if item.is_none() {
                warn!(title = %l.title, "Listing has no category path, skipped");
            }
            item
        })
        .collect();
    let skipped = listings.len() - items.len();
    (items, skipped)
}

fn truncate_path(ids: &[i64], depth: usize) -> Vec<i64> {
    ids.iter().take(depth).copied().collect()
}

fn reduce_image(image: &ImageDescriptor) -> ImageDescriptor {
    IMAGE_KEYS
        .iter()
        .filter_map(|k| image.get(*k).map(|v| (k.to_string(), v.clone())))
        .collect()
}
