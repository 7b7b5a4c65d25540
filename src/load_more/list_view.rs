use std::sync::atomic::{AtomicU64, Ordering};

use crate::load_more::Layout;

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

/// Sentinel for the trailing status row in a host's data sequence.
///
/// Rows compare by identity: every call to [`StatusRow::new`] mints a row
/// that is equal only to itself and its copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusRow {
    id: u64,
}

impl StatusRow {
    pub fn new() -> Self {
        Self {
            id: NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }
}

impl Default for StatusRow {
    fn default() -> Self {
        Self::new()
    }
}

/// Work the controller defers to the host's next UI turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiTask {
    /// Re-render the status row, then invoke the load-more listener.
    RefreshThenNotify,
}

/// What the controller needs from the list it is attached to.
pub trait ListView {
    fn layout(&self) -> Layout;

    /// Total rows in the data sequence, status row included.
    fn item_count(&self) -> usize;

    /// Position of `row` in the data sequence, if it is present.
    fn position_of(&self, row: &StatusRow) -> Option<usize>;

    /// Mark the row at `index` for re-render.
    fn notify_item_changed(&mut self, index: usize);

    /// Queue `task` to run after the current event has been handled.
    /// Hosts hand it back through [`LoadMoreController::run_task`].
    ///
    /// [`LoadMoreController::run_task`]: crate::LoadMoreController::run_task
    fn post(&mut self, task: UiTask);
}
