//! Fixed-size pages over a result set, plus the numbered page window.

use serde::{Serialize, Serializer};

/// Results per page.
pub const PAGE_SIZE: usize = 10;

/// One slot in the page window: a page number or a gap marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u64(*n as u64),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

impl std::fmt::Display for PageMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// A slice of results together with its position in the full set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Global 1-based rank of `items[0]`.
    pub first_rank: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub window: Vec<PageMarker>,
}

impl<'a, T> Page<'a, T> {
    /// Items paired with their global 1-based rank.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &'a T)> + '_ {
        let (first, items) = (self.first_rank, self.items);
        items.iter().enumerate().map(move |(i, item)| (first + i, item))
    }
}

/// Number of pages needed for `len` items. Never less than one.
#[must_use]
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Page numbers to show: the first, the last, and the neighbours of
/// `current`, ascending, with an ellipsis wherever numbers are skipped.
#[must_use]
pub fn page_window(current: usize, total: usize) -> Vec<PageMarker> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    let mut window = Vec::new();
    let mut last_shown = 0;
    for page in 1..=total {
        let near_current = page.abs_diff(current) <= 1;
        if page != 1 && page != total && !near_current {
            continue;
        }
        if last_shown != 0 && page > last_shown + 1 {
            window.push(PageMarker::Ellipsis);
        }
        window.push(PageMarker::Page(page));
        last_shown = page;
    }
    window
}

/// Slice `results` into page `current_page`.
///
/// A page number past the end (or zero) falls back to page 1, matching
/// what happens when a shorter result set replaces a longer one.
pub fn paginate<T>(results: &[T], page_size: usize, current_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total = total_pages(results.len(), page_size);
    let current = if current_page == 0 || current_page > total {
        1
    } else {
        current_page
    };

    let start = ((current - 1) * page_size).min(results.len());
    let end = (start + page_size).min(results.len());

    Page {
        items: &results[start..end],
        first_rank: start + 1,
        current_page: current,
        total_pages: total,
        window: page_window(current, total),
    }
}

/// Tracks the current page for the live result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsPaginator {
    current_page: usize,
    page_size: usize,
    len: usize,
}

impl Default for ResultsPaginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl ResultsPaginator {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            len: 0,
        }
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.len, self.page_size)
    }

    /// A new result set of `len` items replaced the old one.
    pub fn on_results_replaced(&mut self, len: usize) {
        self.len = len;
        if self.current_page > self.total_pages() {
            self.current_page = 1;
        }
    }

    /// Advance one page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        self.goto(self.current_page + 1)
    }

    /// Go back one page. Returns whether the page changed.
    pub fn prev(&mut self) -> bool {
        self.goto(self.current_page.saturating_sub(1))
    }

    /// Jump to `page`, clamped into `[1, total_pages]`.
    pub fn goto(&mut self, page: usize) -> bool {
        let target = page.clamp(1, self.total_pages());
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
        self.len = 0;
    }

    /// The current page of `results`. `results` must be the set last
    /// reported through [`Self::on_results_replaced`].
    pub fn page<'a, T>(&self, results: &'a [T]) -> Page<'a, T> {
        paginate(results, self.page_size, self.current_page)
    }
}
