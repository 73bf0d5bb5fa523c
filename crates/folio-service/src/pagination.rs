use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// One page of a resource.
///
/// Producers always build pages through [`Page::new`] so that `total_pages`
/// is at least 1 and `current_page` lies in `[1, total_pages]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, requested_page: u32, limit: u32, total_items: u64) -> Self {
        let total_pages = total_pages(total_items, limit);
        Self {
            items,
            total_pages,
            current_page: clamp_page(requested_page, total_pages),
            total_items,
        }
    }
}

/// `ceil(total_items / limit)`, never less than 1.
pub fn total_pages(total_items: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total_items.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Zero-based offset of the first item on `page`.
pub fn page_offset(page: u32, limit: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(limit)
}

/// Slices an in-memory, already ordered collection.
pub fn slice_page<T: Clone>(items: &[T], page: u32, limit: u32) -> Page<T> {
    let limit = limit.max(1);
    let total_items = items.len() as u64;
    let page = clamp_page(page, total_pages(total_items, limit));

    let start = usize::try_from(page_offset(page, limit)).unwrap_or(usize::MAX);
    let window = items
        .iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();

    Page::new(window, page, limit, total_items)
}
