use crate::load_more::LoadMoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// One scroll tick, in host units. Positive values scroll toward the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollDelta {
    pub dx: i32,
    pub dy: i32,
}

impl ScrollDelta {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub const fn vertical(dy: i32) -> Self {
        Self { dx: 0, dy }
    }

    pub const fn horizontal(dx: i32) -> Self {
        Self { dx, dy: 0 }
    }

    /// Whether this tick moves forward along `orientation`.
    pub const fn is_forward(&self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Vertical => self.dy > 0,
            Orientation::Horizontal => self.dx > 0,
        }
    }
}

/// Placement strategy reported by the host list, with the positions the
/// evaluator needs. `None` means no item is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Linear {
        orientation: Orientation,
        last_visible: Option<usize>,
    },
    Grid {
        orientation: Orientation,
        span_count: usize,
        last_visible: Option<usize>,
    },
    Staggered {
        orientation: Orientation,
        /// Last visible position of each span, one entry per span.
        last_visible_per_span: Vec<Option<usize>>,
    },
    /// A layout the evaluator knows nothing about.
    Other { name: String },
}

impl Layout {
    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            Self::Linear { orientation, .. }
            | Self::Grid { orientation, .. }
            | Self::Staggered { orientation, .. } => Some(*orientation),
            Self::Other { .. } => None,
        }
    }

    /// Last visible position and orientation. Staggered layouts report the
    /// furthest position across all spans.
    pub fn last_visible(&self) -> Result<(Option<usize>, Orientation), LoadMoreError> {
        match self {
            Self::Linear {
                orientation,
                last_visible,
            }
            | Self::Grid {
                orientation,
                last_visible,
                ..
            } => Ok((*last_visible, *orientation)),
            Self::Staggered {
                orientation,
                last_visible_per_span,
            } => Ok((
                last_visible_per_span.iter().flatten().copied().max(),
                *orientation,
            )),
            Self::Other { name } => Err(LoadMoreError::UnsupportedLayout { name: name.clone() }),
        }
    }

    pub const fn is_grid_like(&self) -> bool {
        matches!(self, Self::Grid { .. } | Self::Staggered { .. })
    }
}
