//! Cursor state of the movie table.

use ratatui::widgets::TableState;

use crate::state::{BrowserState, Movie};

/// View-only state layered over [`BrowserState`].
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct ViewerState {
    /// Table state for the movie list (handles selection and scroll).
    pub table_state: TableState,
    /// List revision the cursor was last reset for.
    synced_revision: u64,
}

impl ViewerState {
    /// Creates a state with no cursor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the cursor to the top whenever the list was replaced.
    pub fn sync(&mut self, browser: &BrowserState) {
        if browser.list_revision() == self.synced_revision {
            return;
        }
        self.synced_revision = browser.list_revision();
        if browser.movies().is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Returns the movie under the cursor (if any).
    #[must_use]
    pub fn current_movie<'a>(&self, browser: &'a BrowserState) -> Option<&'a Movie> {
        browser.movies().get(self.cursor())
    }

    /// Moves cursor up.
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current.saturating_sub(1)));
        }
    }

    /// Moves cursor down within `len` rows.
    pub fn move_down(&mut self, len: usize) {
        let next = self.cursor().saturating_add(1);
        if next < len {
            self.table_state.select(Some(next));
        }
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self, page_size: usize) {
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_sub(page_size)));
    }

    /// Scrolls down by a page within `len` rows.
    pub fn page_down(&mut self, page_size: usize, len: usize) {
        if len == 0 {
            return;
        }
        let max = len.saturating_sub(1);
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_add(page_size).min(max)));
    }
}
