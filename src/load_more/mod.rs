//! Scroll-driven "load more" support for list views.
//!
//! A [`LoadMoreController`] watches scroll ticks reported by a host list,
//! decides when the user has reached the end, and drives a trailing
//! [`StatusRow`] through the [`LoadState`] machine.

mod controller;
mod error;
mod layout;
mod list_view;
mod state;

pub use controller::{FULL_SPAN, LoadMoreController, OnLoadMore};
pub use error::LoadMoreError;
pub use layout::{Layout, Orientation, ScrollDelta};
pub use list_view::{ListView, StatusRow, UiTask};
pub use state::LoadState;
