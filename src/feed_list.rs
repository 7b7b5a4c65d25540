use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use loadmore::{Layout, ListView, Orientation, ScrollDelta, StatusRow, UiTask};

use crate::source::FeedItem;

const PAGE_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Linear,
    Grid,
    Staggered,
}

impl LayoutKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Grid => "Grid",
            Self::Staggered => "Staggered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Item(FeedItem),
    Status(StatusRow),
}

/// Where a row lands on screen, in list-content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub col: usize,
    pub span: usize,
    pub top: usize,
    pub height: usize,
}

impl Placement {
    pub const fn bottom(&self) -> usize {
        self.top + self.height
    }
}

/// Terminal list that hosts the load-more controller.
///
/// Rows are laid out top to bottom in one of three layouts. `offset` is
/// the first content line in view and `viewport` the number of lines
/// shown.
pub struct FeedList {
    rows: Vec<Row>,
    kind: LayoutKind,
    columns: usize,
    status_span: usize,
    selected: usize,
    offset: usize,
    viewport: usize,
    dirty: Vec<usize>,
    ui_tx: mpsc::UnboundedSender<UiTask>,
}

impl FeedList {
    pub fn new(kind: LayoutKind, columns: usize, ui_tx: mpsc::UnboundedSender<UiTask>) -> Self {
        let columns = match kind {
            LayoutKind::Linear => 1,
            LayoutKind::Grid | LayoutKind::Staggered => columns.max(1),
        };
        Self {
            rows: Vec::new(),
            kind,
            columns,
            status_span: 1,
            selected: 0,
            offset: 0,
            viewport: 0,
            dirty: Vec::new(),
            ui_tx,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub const fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn item_len(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, Row::Item(_)))
            .count()
    }

    /// Columns the status row occupies; clamped to the grid width.
    pub fn set_status_span(&mut self, span: usize) {
        self.status_span = span.clamp(1, self.columns);
    }

    pub fn set_viewport(&mut self, lines: usize) {
        self.viewport = lines;
        self.ensure_visible();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.dirty.clear();
        self.selected = 0;
        self.offset = 0;
    }

    pub fn push_status(&mut self, row: StatusRow) {
        self.rows.push(Row::Status(row));
    }

    /// Insert items ahead of the status row, or at the end if there is none.
    pub fn insert_items(&mut self, items: Vec<FeedItem>) {
        let at = self.status_position().unwrap_or(self.rows.len());
        self.rows.splice(at..at, items.into_iter().map(Row::Item));
    }

    pub fn status_position(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| matches!(row, Row::Status(_)))
    }

    /// Rows marked changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.dirty)
    }

    pub fn placements(&self) -> Vec<Placement> {
        match self.kind {
            LayoutKind::Linear => (0..self.rows.len())
                .map(|index| Placement {
                    index,
                    col: 0,
                    span: 1,
                    top: index,
                    height: 1,
                })
                .collect(),
            LayoutKind::Grid => self.grid_placements(),
            LayoutKind::Staggered => self.staggered_placements(),
        }
    }

    fn span_of(&self, row: &Row) -> usize {
        match row {
            Row::Item(_) => 1,
            Row::Status(_) => self.status_span,
        }
    }

    fn grid_placements(&self) -> Vec<Placement> {
        let mut placements = Vec::with_capacity(self.rows.len());
        let (mut line, mut col) = (0, 0);
        for (index, row) in self.rows.iter().enumerate() {
            let span = self.span_of(row);
            if col + span > self.columns {
                line += 1;
                col = 0;
            }
            placements.push(Placement {
                index,
                col,
                span,
                top: line,
                height: 1,
            });
            col += span;
            if col >= self.columns {
                line += 1;
                col = 0;
            }
        }
        placements
    }

    // Items go to the shortest lane; wide rows start below every lane.
    fn staggered_placements(&self) -> Vec<Placement> {
        let mut lanes = vec![0usize; self.columns];
        let mut placements = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            let height = match row {
                Row::Item(item) => usize::from(item.height.max(1)),
                Row::Status(_) => 1,
            };
            if self.span_of(row) > 1 {
                let top = lanes.iter().copied().max().unwrap_or(0);
                lanes.fill(top + height);
                placements.push(Placement {
                    index,
                    col: 0,
                    span: self.columns,
                    top,
                    height,
                });
            } else {
                let (lane, top) = lanes
                    .iter()
                    .copied()
                    .enumerate()
                    .min_by_key(|(_, bottom)| *bottom)
                    .unwrap_or((0, 0));
                lanes[lane] = top + height;
                placements.push(Placement {
                    index,
                    col: lane,
                    span: 1,
                    top,
                    height,
                });
            }
        }
        placements
    }

    pub fn is_visible(&self, placement: &Placement) -> bool {
        placement.top < self.offset + self.viewport && placement.bottom() > self.offset
    }

    fn step(&self) -> usize {
        match self.kind {
            LayoutKind::Grid => self.columns,
            LayoutKind::Linear | LayoutKind::Staggered => 1,
        }
    }

    pub fn select_next(&mut self) -> ScrollDelta {
        self.move_by(self.step() as isize)
    }

    pub fn select_prev(&mut self) -> ScrollDelta {
        self.move_by(-(self.step() as isize))
    }

    pub fn select_first(&mut self) -> ScrollDelta {
        self.move_by(-(self.rows.len() as isize))
    }

    pub fn select_last(&mut self) -> ScrollDelta {
        self.move_by(self.rows.len() as isize)
    }

    pub fn select(&mut self, index: usize) -> ScrollDelta {
        self.move_by(index as isize - self.selected as isize)
    }

    pub fn page_down(&mut self) -> ScrollDelta {
        self.move_by((self.step() * PAGE_ROWS) as isize)
    }

    pub fn page_up(&mut self) -> ScrollDelta {
        self.move_by(-((self.step() * PAGE_ROWS) as isize))
    }

    /// Move the selection and report the move as a scroll tick.
    fn move_by(&mut self, delta: isize) -> ScrollDelta {
        let Some(last) = self.rows.len().checked_sub(1) else {
            return ScrollDelta::default();
        };
        let old = self.selected;
        self.selected = old.saturating_add_signed(delta).min(last);
        self.ensure_visible();

        let dy = self.selected as i64 - old as i64;
        ScrollDelta::vertical(dy.clamp(i32::MIN.into(), i32::MAX.into()) as i32)
    }

    fn ensure_visible(&mut self) {
        if self.viewport == 0 {
            return;
        }
        let Some(placement) = self.placements().get(self.selected).copied() else {
            return;
        };
        if placement.top < self.offset {
            self.offset = placement.top;
        } else if placement.bottom() > self.offset + self.viewport {
            self.offset = placement.bottom().saturating_sub(self.viewport);
        }
    }
}

impl ListView for FeedList {
    fn layout(&self) -> Layout {
        let orientation = Orientation::Vertical;
        let placements = self.placements();
        let visible = placements.iter().filter(|p| self.is_visible(p));
        match self.kind {
            LayoutKind::Linear => Layout::Linear {
                orientation,
                last_visible: visible.map(|p| p.index).max(),
            },
            LayoutKind::Grid => Layout::Grid {
                orientation,
                span_count: self.columns,
                last_visible: visible.map(|p| p.index).max(),
            },
            LayoutKind::Staggered => {
                let mut last_visible_per_span = vec![None; self.columns];
                for placement in visible {
                    for lane in placement.col..placement.col + placement.span {
                        last_visible_per_span[lane] =
                            last_visible_per_span[lane].max(Some(placement.index));
                    }
                }
                Layout::Staggered {
                    orientation,
                    last_visible_per_span,
                }
            }
        }
    }

    fn item_count(&self) -> usize {
        self.rows.len()
    }

    fn position_of(&self, row: &StatusRow) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| matches!(r, Row::Status(status) if status == row))
    }

    fn notify_item_changed(&mut self, index: usize) {
        if !self.dirty.contains(&index) {
            self.dirty.push(index);
        }
    }

    fn post(&mut self, task: UiTask) {
        // Nothing to run once the app has shut down.
        let _ = self.ui_tx.send(task);
    }
}
