//! Cursor movement over a listing.

/// Number of rows moved by page up/down.
pub const PAGE_SIZE: usize = 10;

/// Trait for types that support list-style navigation.
pub trait ListNavigator {
    /// Get the currently selected index.
    fn selected(&self) -> usize;

    /// Set the selected index.
    fn set_selected(&mut self, index: usize);

    /// Get the maximum valid index (item count - 1, or 0 if empty).
    fn max_index(&self) -> usize;

    /// Move selection up by count items.
    fn move_up(&mut self, count: usize) {
        let current = self.selected();
        self.set_selected(current.saturating_sub(count));
    }

    /// Move selection down by count items.
    fn move_down(&mut self, count: usize) {
        let current = self.selected();
        let max = self.max_index();
        self.set_selected((current + count).min(max));
    }

    /// Move by a signed offset.
    fn move_by(&mut self, delta: isize) {
        if delta < 0 {
            self.move_up(delta.unsigned_abs());
        } else {
            self.move_down(delta as usize);
        }
    }

    /// Jump to the first item.
    fn jump_to_top(&mut self) {
        self.set_selected(0);
    }

    /// Jump to the last item.
    fn jump_to_bottom(&mut self) {
        self.set_selected(self.max_index());
    }
}

/// Index cursor over a list of known length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    selected: usize,
    count: usize,
}

impl Cursor {
    /// Create a cursor at `selected`, clamped to the list.
    pub fn new(selected: usize, count: usize) -> Self {
        let mut cursor = Self { selected: 0, count };
        cursor.set_selected(selected);
        cursor
    }

    /// Number of items.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl ListNavigator for Cursor {
    fn selected(&self) -> usize {
        self.selected
    }

    fn set_selected(&mut self, index: usize) {
        self.selected = index.min(self.max_index());
    }

    fn max_index(&self) -> usize {
        self.count.saturating_sub(1)
    }
}
