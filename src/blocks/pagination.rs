//! Cursor pagination over id-descending collections.
//!
//! The whole listing domain is ordered by monotonic id, newest first.
//! Bounds are exclusive on both sides: `max_id` caps from above (ids
//! strictly smaller qualify), `since_id` cuts from below (ids strictly
//! larger qualify). Cursors are plain ids: `next_cursor` feeds the next
//! request's `max_id`, `prev_cursor` feeds `since_id` — the latter is
//! present for any non-empty page so clients can poll for newer entries.

/// Request-side pagination bounds. `limit` is already clamped by the caller.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub since_id: Option<i64>,
    pub max_id: Option<i64>,
    pub limit: usize,
}

/// One page of an id-descending collection plus its navigation cursors.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Id of the first (largest) entry — becomes since_id of the prev link.
    pub prev_cursor: Option<i64>,
    /// Id of the last (smallest) entry — becomes max_id of the next link.
    /// Absent when no qualifying entries remain beyond this page.
    pub next_cursor: Option<i64>,
}

/// Slice an id-descending collection into one page.
///
/// `id_of` projects the cursor key out of an item. The input must already
/// be sorted by that key, descending; output order is preserved.
/// Deterministic: same inputs, same page.
pub fn paginate<T, F>(items: Vec<T>, id_of: F, params: &PageParams) -> Page<T>
where
    F: Fn(&T) -> i64,
{
    let mut qualifying: Vec<T> = items
        .into_iter()
        .filter(|item| {
            let id = id_of(item);
            params.max_id.is_none_or(|max| id < max)
                && params.since_id.is_none_or(|since| id > since)
        })
        .collect();

    let has_more = qualifying.len() > params.limit;
    qualifying.truncate(params.limit);

    let prev_cursor = qualifying.first().map(&id_of);
    let next_cursor = if has_more {
        qualifying.last().map(&id_of)
    } else {
        None
    };

    Page {
        items: qualifying,
        prev_cursor,
        next_cursor,
    }
}
