use std::fmt;

/// Status of the trailing load-more row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    Loading,
    /// Last load finished; more may be available.
    #[default]
    Completed,
    /// The source is exhausted.
    NoMore,
    Failure,
}

impl LoadState {
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Completed => "completed",
            Self::NoMore => "no more",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
