//! In-memory page slicing with JSON:API `meta.page`.

use serde::Serialize;
use serde_json::{json, Value};

use super::query::Page;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageMeta {
    pub current_page: u64,
    pub per_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub total: u64,
    pub last_page: u64,
}

impl PageMeta {
    pub fn into_meta(self) -> Value {
        json!({ "page": self })
    }
}

/// Keep the requested page of `items`.
pub fn paginate<T>(items: Vec<T>, page: Page) -> (Vec<T>, PageMeta) {
    let total = items.len() as u64;
    let skip = (page.number - 1).saturating_mul(page.size);
    let slice: Vec<T> = items
        .into_iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(usize::try_from(page.size).unwrap_or(usize::MAX))
        .collect();

    let count = slice.len() as u64;
    let (from, to) = if count == 0 {
        (None, None)
    } else {
        (Some(skip + 1), Some(skip + count))
    };

    let meta = PageMeta {
        current_page: page.number,
        per_page: page.size,
        from,
        to,
        total,
        last_page: total.div_ceil(page.size).max(1),
    };
    (slice, meta)
}
