//! In-memory search and pagination over an already fetched list.

use crate::models::Searchable;

/// Rows shown per page.
pub const PAGE_SIZE: usize = 5;

/// The fetched records, the subset matching the search text, and the page cursor.
#[derive(Debug, Clone)]
pub struct SearchableList<T> {
    all: Vec<T>,
    filtered: Vec<T>,
    search: String,
    page: usize,
}

impl<T: Searchable + Clone> SearchableList<T> {
    pub fn new() -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            search: String::new(),
            page: 1,
        }
    }

    /// Replaces the full set, re-applying the current search.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.all = items;
        self.refilter();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.refilter();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
        self.refilter();
    }

    pub fn pop_search_char(&mut self) {
        if self.search.pop().is_some() {
            self.refilter();
        }
    }

    /// Recomputes the filtered view and returns to the first page.
    fn refilter(&mut self) {
        let needle = self.search.to_lowercase();
        self.filtered = self
            .all
            .iter()
            .filter(|item| item.matches(&needle))
            .cloned()
            .collect();
        self.page = 1;
    }

    pub fn all(&self) -> &[T] {
        &self.all
    }

    pub fn filtered(&self) -> &[T] {
        &self.filtered
    }

    /// 1-based index of the current page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(PAGE_SIZE)
    }

    /// Rows `[PAGE_SIZE * (page - 1), PAGE_SIZE * page)` of the filtered set.
    pub fn page_items(&self) -> &[T] {
        let start = (self.page - 1) * PAGE_SIZE;
        if start >= self.filtered.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Page controls are only shown when there is more than one page.
    pub fn shows_controls(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn previous_page(&mut self) -> bool {
        if self.has_previous() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        if (1..=self.total_pages()).contains(&page) {
            self.page = page;
            true
        } else {
            false
        }
    }
}

impl<T: Searchable + Clone> Default for SearchableList<T> {
    fn default() -> Self {
        Self::new()
    }
}
