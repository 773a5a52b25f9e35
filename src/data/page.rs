use std::ops::Range;

use super::ConfigError;

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 50;

// ---------------------------------------------------------------------------
// Page – one slice of the filtered set
// ---------------------------------------------------------------------------

/// A resolved page over a filtered row count. `number` is already clamped to
/// `[1, total_pages]`; the caller should store it back as the next requested
/// page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl Page {
    /// Index range of this page within the filtered set. Empty when there
    /// are no rows.
    pub fn range(&self) -> Range<usize> {
        let start = (self.number - 1) * self.size;
        let end = (start + self.size).min(self.total_rows);
        start.min(end)..end
    }
}

/// Resolve `requested_page` against the filtered row count.
///
/// An empty filtered set still yields one (empty) page, so the controls
/// always have something to point at.
pub fn paginate(
    total_rows: usize,
    page_size: usize,
    requested_page: usize,
) -> Result<Page, ConfigError> {
    if page_size == 0 {
        return Err(ConfigError::InvalidPageSize(page_size));
    }
    let total_pages = total_rows.div_ceil(page_size).max(1);
    Ok(Page {
        number: requested_page.clamp(1, total_pages),
        size: page_size,
        total_pages,
        total_rows,
    })
}

// ---------------------------------------------------------------------------
// Visible page window – the numbers shown in the pagination controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

/// Compact page list for the controls: page 1, up to two pages either side
/// of the current one, the last page, and a single ellipsis over each gap.
pub fn visible_pages(current: usize, total_pages: usize) -> Vec<PageToken> {
    let mut tokens = vec![PageToken::Page(1)];

    let window_start = current.saturating_sub(2).max(2);
    let window_end = (current + 2).min(total_pages.saturating_sub(1));

    if window_start > 2 {
        tokens.push(PageToken::Ellipsis);
    }
    for page in window_start..=window_end {
        tokens.push(PageToken::Page(page));
    }
    if window_end + 1 < total_pages {
        tokens.push(PageToken::Ellipsis);
    }
    if total_pages > 1 {
        tokens.push(PageToken::Page(total_pages));
    }

    tokens
}
