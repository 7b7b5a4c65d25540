use std::fmt;

use tracing::{debug, trace, warn};

use crate::load_more::{ListView, LoadMoreError, LoadState, ScrollDelta, StatusRow, UiTask};

/// Span size that asks a grid host to stretch the status row across every
/// column. Hosts clamp it to their own column count.
pub const FULL_SPAN: usize = usize::MAX;

const DEFAULT_SPAN: usize = 1;

/// Callback fired when the controller wants the next page.
pub trait OnLoadMore {
    fn on_load_more(&mut self);
}

impl<F: FnMut()> OnLoadMore for F {
    fn on_load_more(&mut self) {
        self()
    }
}

/// Tracks load status for a list and decides when to ask for more data.
///
/// The controller never holds on to the list itself. Hosts pass their
/// [`ListView`] into each call, and report attachment through
/// [`attach`](Self::attach) / [`detach`](Self::detach).
pub struct LoadMoreController {
    state: LoadState,
    row: StatusRow,
    listener: Option<Box<dyn OnLoadMore>>,
    attached: bool,
}

impl Default for LoadMoreController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoadMoreController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadMoreController")
            .field("state", &self.state)
            .field("row", &self.row)
            .field("has_listener", &self.listener.is_some())
            .field("attached", &self.attached)
            .finish()
    }
}

impl LoadMoreController {
    pub fn new() -> Self {
        Self {
            state: LoadState::Completed,
            row: StatusRow::new(),
            listener: None,
            attached: false,
        }
    }

    /// The sentinel the host should append to its data sequence.
    pub const fn status_row(&self) -> StatusRow {
        self.row
    }

    pub const fn state(&self) -> LoadState {
        self.state
    }

    pub const fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn OnLoadMore>>) {
        self.listener = listener;
    }

    pub fn on_load_more(&mut self, listener: impl OnLoadMore + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn take_listener(&mut self) -> Option<Box<dyn OnLoadMore>> {
        self.listener.take()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// How many grid columns the status row occupies.
    pub const fn span_size(&self) -> usize {
        if self.attached {
            FULL_SPAN
        } else {
            DEFAULT_SPAN
        }
    }

    /// Feed one scroll tick. Returns whether a load was started.
    pub fn on_scroll(
        &mut self,
        view: &mut impl ListView,
        delta: ScrollDelta,
    ) -> Result<bool, LoadMoreError> {
        if !self.can_load_more(view, delta)? {
            return Ok(false);
        }
        self.start_load(view);
        Ok(true)
    }

    /// Whether `delta` scrolls forward with the last item in view, the
    /// status row present, and no load already running.
    pub fn can_load_more(
        &self,
        view: &impl ListView,
        delta: ScrollDelta,
    ) -> Result<bool, LoadMoreError> {
        if view.position_of(&self.row).is_none() || self.is_loading() {
            return Ok(false);
        }

        let (last_visible, orientation) = view.layout().last_visible().inspect_err(|e| {
            warn!(error = %e, "cannot evaluate scroll position");
        })?;

        let last_index = view.item_count().saturating_sub(1);
        let reached_end = last_visible.is_some_and(|last| last >= last_index);
        Ok(reached_end && delta.is_forward(orientation))
    }

    /// Enter `Loading` and schedule the listener for the next UI turn.
    ///
    /// Nothing is dispatched while already loading, without a listener, or
    /// while detached; in the last two cases the state still changes.
    pub fn start_load(&mut self, view: &mut impl ListView) {
        if self.is_loading() {
            trace!("load already running");
            return;
        }
        self.transition(LoadState::Loading);
        if self.listener.is_some() && self.attached {
            trace!("posting refresh-then-notify");
            view.post(UiTask::RefreshThenNotify);
        }
    }

    /// Execute a task previously handed to [`ListView::post`].
    pub fn run_task(&mut self, view: &mut impl ListView, task: UiTask) {
        match task {
            UiTask::RefreshThenNotify => {
                self.refresh_row(view);
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_load_more();
                }
            }
        }
    }

    pub fn completed(&mut self, view: &mut impl ListView) {
        self.transition(LoadState::Completed);
        self.refresh_row(view);
    }

    pub fn no_more(&mut self, view: &mut impl ListView) {
        self.transition(LoadState::NoMore);
        self.refresh_row(view);
    }

    pub fn failure(&mut self, view: &mut impl ListView) {
        self.transition(LoadState::Failure);
        self.refresh_row(view);
    }

    fn transition(&mut self, to: LoadState) {
        debug!(from = %self.state, %to, "load state");
        self.state = to;
    }

    // The status row trails the list, so the last position is refreshed.
    fn refresh_row(&self, view: &mut impl ListView) {
        if let Some(last) = view.item_count().checked_sub(1) {
            view.notify_item_changed(last);
        }
    }
}
