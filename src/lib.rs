pub mod load_more;

pub use load_more::{
    FULL_SPAN, Layout, ListView, LoadMoreController, LoadMoreError, LoadState, OnLoadMore,
    Orientation, ScrollDelta, StatusRow, UiTask,
};
