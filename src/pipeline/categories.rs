use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::PipelineError;
use crate::records::{CategoryRecord, ExtractedItem};

pub fn load_reference(path: &Path) -> Result<Vec<CategoryRecord>, PipelineError> {
    let load_err = |reason: String| PipelineError::CategoryLoad {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| load_err(e.to_string()))
}

/// Reference rows whose id appears on any item's category path, in table order.
pub fn resolve(items: &[ExtractedItem], reference: &[CategoryRecord]) -> Vec<CategoryRecord> {
    let used: HashSet<i64> = items
        .iter()
        .flat_map(|i| i.category_path_ids.iter().copied())
        .collect();
    reference
        .iter()
        .filter(|c| used.contains(&c.category_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(path: Vec<i64>) -> ExtractedItem {
        ExtractedItem {
            title: "t".into(),
            description: "d".into(),
            price: 1.0,
            category_id: *path.last().unwrap(),
            category_path_ids: path,
            materials: vec![],
            images: vec![],
            handmade: true,
            num_favorers: None,
        }
    }

    fn category(id: i64) -> CategoryRecord {
        CategoryRecord {
            category_id: id,
            page_title: Some(format!("Category {}", id)),
            page_description: None,
            short_name: Some(format!("c{}", id)),
            parent: None,
        }
    }

    #[test]
    fn resolves_exact_intersection() {
        let items = vec![item(vec![1, 2, 3]), item(vec![1, 5])];
        let reference: Vec<_> = [9, 5, 4, 3, 2, 1].into_iter().map(category).collect();
        let ids: Vec<i64> = resolve(&items, &reference)
            .iter()
            .map(|c| c.category_id)
            .collect();
        assert_eq!(ids, vec![5, 3, 2, 1]);
    }

    #[test]
    fn ids_missing_from_reference_are_ignored() {
        let items = vec![item(vec![1, 77])];
        let reference = vec![category(1)];
        assert_eq!(resolve(&items, &reference), vec![category(1)]);
    }

    #[test]
    fn no_items_no_categories() {
        assert!(resolve(&[], &[category(1)]).is_empty());
    }

    #[test]
    fn load_reference_restricts_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        let rows = json!([
            {"category_id": 1, "name": "art", "short_name": "Art", "parent": null,
             "page_title": "Art", "page_description": "All art", "num_children": 4},
            {"category_id": 2, "short_name": "Prints", "parent": "art",
             "page_title": "Prints", "page_description": "Prints"}
        ]);
        std::fs::write(&path, rows.to_string()).unwrap();
        let reference = load_reference(&path).unwrap();
        assert_eq!(reference.len(), 2);
        let out = serde_json::to_value(&reference[0]).unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(reference[1].parent, Some(json!("art")));
    }

    #[test]
    fn missing_reference_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let r = load_reference(&dir.path().join("categories.json"));
        assert!(matches!(r, Err(PipelineError::CategoryLoad { .. })));
    }
}
