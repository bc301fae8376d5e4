use log::debug;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

/// Component for the database list
///
/// Holds the filtered database names, which one is selected and where the
/// list was last drawn so mouse clicks can be mapped back to rows.
#[derive(Debug, Default)]
pub struct DatabaseBrowser {
    pub databases: Vec<String>,
    pub list_state: ListState,
    /// Outer area of the list block from the last frame
    pub area: Option<Rect>,
}

impl DatabaseBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list; any previous selection is dropped
    pub fn set_databases(&mut self, databases: Vec<String>) {
        debug!("Database browser now holds {} databases", databases.len());
        self.databases = databases;
        self.list_state = ListState::default();
    }

    pub fn clear(&mut self) {
        self.set_databases(Vec::new());
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected().filter(|i| *i < self.databases.len())
    }

    /// The database backup and restore act on
    pub fn selected_database(&self) -> Option<&str> {
        self.selected_index().map(|i| self.databases[i].as_str())
    }

    /// Select a row; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> Option<&str> {
        if index < self.databases.len() {
            self.list_state.select(Some(index));
        }
        self.selected_database()
    }

    /// Move selection down, wrapping around
    pub fn next(&mut self) -> Option<&str> {
        if self.databases.is_empty() {
            return None;
        }
        let next = match self.selected_index() {
            Some(i) => (i + 1) % self.databases.len(),
            None => 0,
        };
        self.select(next)
    }

    /// Move selection up, wrapping around
    pub fn previous(&mut self) -> Option<&str> {
        if self.databases.is_empty() {
            return None;
        }
        let prev = match self.selected_index() {
            Some(0) | None => self.databases.len() - 1,
            Some(i) => i - 1,
        };
        self.select(prev)
    }

    /// Map a terminal cell to a list row, accounting for the border and scroll offset
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.area?;
        if area.width < 2 || area.height < 2 {
            return None;
        }
        let inner = Rect::new(area.x + 1, area.y + 1, area.width - 2, area.height - 2);
        let inside = column >= inner.x
            && column < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height;
        if !inside {
            return None;
        }
        let index = self.list_state.offset() + (row - inner.y) as usize;
        (index < self.databases.len()).then_some(index)
    }
}
