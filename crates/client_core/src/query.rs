//! Filter → sort → paginate over the user store.

use shared::domain::{SortDirection, SortKey, UserRecord};

pub const USERS_PER_PAGE: usize = 5;

/// Keeps records whose name or email contains `search`, ignoring case.
pub fn filter_users<'a>(records: &'a [UserRecord], search: &str) -> Vec<&'a UserRecord> {
    if search.is_empty() {
        return records.iter().collect();
    }
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.name.to_lowercase().contains(&needle)
                || record.email.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stable sort; `SortKey::None` leaves the input order alone.
pub fn sort_users(rows: &mut [&UserRecord], key: SortKey, direction: SortDirection) {
    if key == SortKey::None {
        return;
    }
    rows.sort_by(|a, b| direction.apply(a.compare_by(b, key)));
}

/// One-based page slice. A page past the end is empty, not clamped.
pub fn paginate<T>(rows: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if page == 0 || start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search_text: String,
    sort_key: SortKey,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_key: SortKey::None,
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size: USERS_PER_PAGE,
        }
    }
}

impl QueryState {
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    /// Same key while ascending flips to descending; anything else sorts
    /// ascending by `key`. The page is kept.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort_direction =
            if self.sort_key == key && self.sort_direction == SortDirection::Asc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
        self.sort_key = key;
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort_key = key;
        self.sort_direction = direction;
    }

    /// Jumps straight to `page` without bounds checks beyond `page >= 1`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, filtered_count: usize) -> bool {
        self.page.saturating_mul(self.page_size) < filtered_count
    }

    pub fn next_page(&mut self, filtered_count: usize) -> bool {
        if !self.has_next(filtered_count) {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Called after a removal. Steps back one page when the current page now
    /// starts past the end of the remaining rows.
    pub fn after_removal(&mut self, remaining: usize) -> bool {
        let first_index = (self.page - 1).saturating_mul(self.page_size);
        if self.page > 1 && remaining <= first_index {
            self.page -= 1;
            return true;
        }
        false
    }

    /// Rows matching the search, in display order.
    pub fn filtered<'a>(&self, records: &'a [UserRecord]) -> Vec<&'a UserRecord> {
        let mut rows = filter_users(records, &self.search_text);
        sort_users(&mut rows, self.sort_key, self.sort_direction);
        rows
    }

    pub fn window(&self, records: &[UserRecord]) -> ViewWindow {
        let rows = self.filtered(records);
        ViewWindow {
            rows: paginate(&rows, self.page, self.page_size)
                .iter()
                .map(|record| (*record).clone())
                .collect(),
            page: self.page,
            filtered_count: rows.len(),
            has_previous: self.has_previous(),
            has_next: self.has_next(rows.len()),
        }
    }
}

/// What the current page shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewWindow {
    pub rows: Vec<UserRecord>,
    pub page: usize,
    pub filtered_count: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
