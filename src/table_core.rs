//! Headless state for the generic data table: sorting, pagination and
//! row selection. The `table` module renders this; nothing here touches the
//! DOM, so the invariants are unit-tested on the host.

use std::collections::HashSet;

/// One displayable cell. Pages build rows out of plain text and links; the
/// renderer matches exhaustively instead of sniffing an untyped value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Link { label: String, href: String },
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        CellValue::Link {
            label: label.into(),
            href: href.into(),
        }
    }

    /// The string sorting and badge rendering operate on.
    pub fn sort_key(&self) -> &str {
        match self {
            CellValue::Text(s) => s,
            CellValue::Link { label, .. } => label,
        }
    }
}

/// A table row. `id` is the stable record key selection is tracked by;
/// `cells` line up with the column list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new(id: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            id: id.into(),
            cells,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortConfig {
    /// Column index being sorted, or none for input order.
    pub key: Option<usize>,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Header click: same column flips direction, a new column starts
    /// ascending.
    pub fn toggle(self, column: usize) -> Self {
        let direction = if self.key == Some(column) && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self {
            key: Some(column),
            direction,
        }
    }
}

/// Stable sort of the full row list by the configured column.
pub fn sort_rows(rows: &[Row], config: SortConfig) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    if let Some(key) = config.key {
        sorted.sort_by(|a, b| {
            let left = a.cells.get(key).map(CellValue::sort_key).unwrap_or("");
            let right = b.cells.get(key).map(CellValue::sort_key).unwrap_or("");
            match config.direction {
                SortDirection::Ascending => left.cmp(right),
                SortDirection::Descending => right.cmp(left),
            }
        });
    }
    sorted
}

pub const ROWS_PER_PAGE_CHOICES: [usize; 4] = [10, 25, 50, 100];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    pub page: usize,
    pub rows_per_page: usize,
}

impl PageState {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            page: 1,
            rows_per_page,
        }
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.rows_per_page).max(1)
    }

    /// Bounds of the current page slice within the sorted list.
    pub fn slice_bounds(&self, len: usize) -> (usize, usize) {
        let start = (self.page - 1) * self.rows_per_page;
        let end = (start + self.rows_per_page).min(len);
        (start.min(len), end)
    }

    pub fn set_page(&mut self, page: usize, len: usize) {
        self.page = page.clamp(1, self.total_pages(len));
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn next(&mut self, len: usize) {
        self.page = (self.page + 1).min(self.total_pages(len));
    }

    /// Changing page size always jumps back to the first page.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.rows_per_page = rows_per_page.max(1);
        self.page = 1;
    }
}

/// Row selection keyed by record id, so re-sorting between selecting and
/// acting cannot redirect the action to different rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSelection {
    selected: HashSet<String>,
}

impl RowSelection {
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn all_selected(&self, rows: &[Row]) -> bool {
        !rows.is_empty() && rows.iter().all(|row| self.selected.contains(&row.id))
    }

    /// Header checkbox: everything selected clears, anything else selects the
    /// whole list.
    pub fn toggle_all(&mut self, rows: &[Row]) {
        if self.all_selected(rows) {
            self.selected.clear();
        } else {
            self.selected = rows.iter().map(|row| row.id.clone()).collect();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selected rows in the order of `rows`, clearing the selection. The
    /// caller hands the result to its bulk callback; whatever that callback
    /// does, the selection is already gone.
    pub fn take_selected(&mut self, rows: &[Row]) -> Vec<Row> {
        let taken: Vec<Row> = rows
            .iter()
            .filter(|row| self.selected.contains(&row.id))
            .cloned()
            .collect();
        self.selected.clear();
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(ids: &[&str]) -> Vec<Row> {
        ids.iter()
            .map(|id| Row::new(*id, vec![CellValue::text(id.to_uppercase())]))
            .collect()
    }

    #[test]
    fn total_pages_and_slice_laws() {
        let mut page = PageState::new(10);
        for len in [0usize, 1, 9, 10, 11, 25, 99, 100, 101] {
            assert_eq!(page.total_pages(len), len.div_ceil(10).max(1));
            for p in 1..=page.total_pages(len) {
                page.set_page(p, len);
                let (start, end) = page.slice_bounds(len);
                assert!(end - start <= 10);
                if p < page.total_pages(len) && len > 0 {
                    assert_eq!(end - start, 10);
                }
            }
        }
        // Last page holds the remainder.
        page.set_rows_per_page(10);
        page.set_page(3, 25);
        assert_eq!(page.slice_bounds(25), (20, 25));
    }

    #[test]
    fn rows_per_page_change_resets_page() {
        let mut page = PageState::new(10);
        page.set_page(4, 100);
        page.set_rows_per_page(25);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages(100), 4);
    }

    #[test]
    fn previous_and_next_clamp() {
        let mut page = PageState::new(10);
        page.previous();
        assert_eq!(page.page, 1);
        for _ in 0..10 {
            page.next(25);
        }
        assert_eq!(page.page, 3);
    }

    #[test]
    fn sort_toggle_flips_then_resets() {
        let config = SortConfig::default();
        let asc = config.toggle(0);
        assert_eq!(asc.direction, SortDirection::Ascending);
        let desc = asc.toggle(0);
        assert_eq!(desc.direction, SortDirection::Descending);
        // Third click on the same column returns to ascending.
        assert_eq!(desc.toggle(0).direction, SortDirection::Ascending);
        // A different column resets to ascending.
        assert_eq!(desc.toggle(1).direction, SortDirection::Ascending);
    }

    #[test]
    fn sorting_desc_reverses_distinct_keys() {
        let data = rows(&["b", "a", "c"]);
        let asc = sort_rows(&data, SortConfig::default().toggle(0));
        let desc = sort_rows(&data, SortConfig::default().toggle(0).toggle(0));
        let asc_ids: Vec<_> = asc.iter().map(|r| r.id.as_str()).collect();
        let mut desc_ids: Vec<_> = desc.iter().map(|r| r.id.as_str()).collect();
        desc_ids.reverse();
        assert_eq!(asc_ids, vec!["a", "b", "c"]);
        assert_eq!(asc_ids, desc_ids);
    }

    #[test]
    fn no_sort_key_preserves_input_order() {
        let data = rows(&["b", "a"]);
        assert_eq!(sort_rows(&data, SortConfig::default()), data);
    }

    #[test]
    fn select_all_then_deselect_one() {
        let data = rows(&["a", "b", "c"]);
        let mut selection = RowSelection::default();
        selection.toggle_all(&data);
        assert!(selection.all_selected(&data));
        selection.toggle("b");
        assert_eq!(selection.len(), data.len() - 1);
        assert!(!selection.all_selected(&data));
        selection.toggle_all(&data);
        assert!(selection.all_selected(&data));
        selection.toggle_all(&data);
        assert!(selection.is_empty());
    }

    #[test]
    fn selection_survives_resort() {
        let data = rows(&["b", "a", "c"]);
        let mut selection = RowSelection::default();
        selection.toggle("a");
        selection.toggle("c");
        let sorted = sort_rows(&data, SortConfig::default().toggle(0));
        let taken = selection.take_selected(&sorted);
        let ids: Vec<_> = taken.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(selection.is_empty());
    }

    #[test]
    fn take_selected_clears_even_when_partial() {
        let data = rows(&["a", "b"]);
        let mut selection = RowSelection::default();
        selection.toggle("a");
        selection.toggle("gone");
        let taken = selection.take_selected(&data);
        assert_eq!(taken.len(), 1);
        assert!(selection.is_empty());
    }
}
