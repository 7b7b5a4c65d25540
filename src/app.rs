use std::collections::VecDeque;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use loadmore::{LoadMoreController, LoadMoreError, LoadState, ScrollDelta, UiTask};

use crate::feed_list::{FeedList, LayoutKind};
use crate::source::{Page, PagedSource, SourceError};
use crate::theme::ResolvedTheme;

/// Outcome of a page fetch, sent back to the UI loop.
#[derive(Debug)]
pub struct PageResult {
    pub generation: u64,
    pub task_id: u64,
    pub page: usize,
    pub result: Result<Page, SourceError>,
}

/// Sent by the load-more listener; the loop turns it into a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest;

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.log.push_back(LogEntry {
            message: msg.into(),
        });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let desc = description.into();
        self.log(format!("Started: {}", desc));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    PageDown,
    PageUp,
    Retry,
    Reload,
    Quit,
    ToggleHelp,
    ToggleDebug,
    UpdateViewportHeight(u16),
}

pub struct App {
    pub list: FeedList,
    pub load_more: LoadMoreController,
    /// State shown by the status row, as of its last refresh.
    pub status_view: LoadState,
    pub status_since: Option<Instant>,
    pub source: PagedSource,
    pub next_page: usize,
    pub initial_loading: bool,
    /// First page failed; there is no list to show.
    pub error: Option<String>,
    /// Reason for the last failed page, shown in the status row.
    pub load_error: Option<String>,
    pub should_quit: bool,
    pub show_help: bool,
    pub theme: ResolvedTheme,
    // Async task management
    pub result_tx: mpsc::Sender<PageResult>,
    pub result_rx: mpsc::Receiver<PageResult>,
    pub ui_rx: mpsc::UnboundedReceiver<UiTask>,
    pub request_rx: mpsc::UnboundedReceiver<LoadRequest>,
    pub generation: u64,
    pub debug: DebugState,
    pub terminal_height: Option<u16>,
}

impl App {
    const LAYOUT_OVERHEAD: u16 = 3; // 2 borders + 1 status bar
    pub const DEBUG_HEIGHT: u16 = 10;

    pub fn new(theme: ResolvedTheme, source: PagedSource, kind: LayoutKind, columns: usize) -> Self {
        let (result_tx, result_rx) = mpsc::channel(10);
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::unbounded_channel();

        let mut list = FeedList::new(kind, columns, ui_tx);
        let mut load_more = LoadMoreController::new();
        load_more.attach();
        list.set_status_span(load_more.span_size());
        load_more.on_load_more(move || {
            let _ = request_tx.send(LoadRequest);
        });

        Self {
            list,
            load_more,
            status_view: LoadState::default(),
            status_since: None,
            source,
            next_page: 0,
            initial_loading: false,
            error: None,
            load_error: None,
            should_quit: false,
            show_help: false,
            theme,
            result_tx,
            result_rx,
            ui_rx,
            request_rx,
            generation: 0,
            debug: DebugState::new(),
            terminal_height: None,
        }
    }

    pub fn update(&mut self, msg: Message) -> Result<(), LoadMoreError> {
        match msg {
            Message::SelectNext => {
                let delta = self.list.select_next();
                self.scroll(delta)?;
            }
            Message::SelectPrev => {
                let delta = self.list.select_prev();
                self.scroll(delta)?;
            }
            Message::SelectFirst => {
                let delta = self.list.select_first();
                self.scroll(delta)?;
            }
            Message::SelectLast => {
                let delta = self.list.select_last();
                self.scroll(delta)?;
            }
            Message::PageDown => {
                let delta = self.list.page_down();
                self.scroll(delta)?;
            }
            Message::PageUp => {
                let delta = self.list.page_up();
                self.scroll(delta)?;
            }
            Message::Retry => self.retry(),
            Message::Reload => self.load_first_page(),
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::ToggleDebug => {
                self.debug.toggle();
                self.resize_viewport();
            }
            Message::UpdateViewportHeight(height) => {
                self.terminal_height = Some(height);
                self.resize_viewport();
            }
        }
        Ok(())
    }

    fn scroll(&mut self, delta: ScrollDelta) -> Result<(), LoadMoreError> {
        if self.load_more.on_scroll(&mut self.list, delta)? {
            self.debug
                .log(format!("Reached end, requesting page {}", self.next_page + 1));
        }
        Ok(())
    }

    fn retry(&mut self) {
        if self.error.is_some() {
            self.load_first_page();
        } else if self.load_more.state() == LoadState::Failure {
            self.load_error = None;
            self.load_more.start_load(&mut self.list);
        }
    }

    /// Lines available to the list for the current terminal height.
    pub fn viewport_lines(&self) -> usize {
        let Some(height) = self.terminal_height else {
            return 0;
        };
        let debug = if self.debug.visible {
            Self::DEBUG_HEIGHT
        } else {
            0
        };
        height.saturating_sub(Self::LAYOUT_OVERHEAD + debug) as usize
    }

    fn resize_viewport(&mut self) {
        self.list.set_viewport(self.viewport_lines());
    }

    /// Drop everything and fetch from the first page again.
    pub fn load_first_page(&mut self) {
        self.generation += 1;
        self.initial_loading = true;
        self.error = None;
        self.load_error = None;
        self.next_page = 0;
        self.list.clear();
        // Resolves a load abandoned by the reload.
        self.load_more.completed(&mut self.list);
        self.spawn_page_fetch(0);
    }

    /// Run deferred UI work and apply finished fetches. Called once per loop
    /// turn, after drawing.
    ///
    /// Requests raised by the listener are served on the following turn, so
    /// the refreshed status row is on screen before its fetch starts.
    pub fn pump(&mut self) {
        while let Ok(LoadRequest) = self.request_rx.try_recv() {
            self.request_next_page();
        }
        while let Ok(task) = self.ui_rx.try_recv() {
            self.load_more.run_task(&mut self.list, task);
        }
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_page_result(result);
        }
        self.rebind_rows();
    }

    fn request_next_page(&mut self) {
        if self.next_page >= self.source.config().max_pages {
            debug!(page = self.next_page, "feed exhausted, not fetching");
            self.load_more.no_more(&mut self.list);
            return;
        }
        self.spawn_page_fetch(self.next_page);
    }

    /// Re-read state for rows marked changed. Only the status row carries
    /// state.
    pub fn rebind_rows(&mut self) {
        let status = self.list.status_position();
        for index in self.list.take_dirty() {
            if Some(index) != status {
                continue;
            }
            let state = self.load_more.state();
            if state != self.status_view {
                self.status_since = Some(Instant::now());
            }
            self.status_view = state;
            debug!(index, %state, "status row rebound");
        }
    }

    pub fn handle_page_result(&mut self, result: PageResult) {
        let PageResult {
            generation,
            task_id,
            page,
            result,
        } = result;

        if generation != self.generation {
            self.debug.end_task(task_id, "discarded (stale)");
            return;
        }
        self.debug.end_task(
            task_id,
            if result.is_ok() {
                "completed"
            } else {
                "failed"
            },
        );

        match result {
            Ok(Page { items, has_more }) => {
                info!(page, count = items.len(), has_more, "page loaded");
                self.list.insert_items(items);
                if page == 0 {
                    self.initial_loading = false;
                    self.list.push_status(self.load_more.status_row());
                }
                self.next_page = page + 1;
                self.load_error = None;
                if has_more {
                    self.load_more.completed(&mut self.list);
                } else {
                    self.load_more.no_more(&mut self.list);
                }
            }
            Err(SourceError::OutOfRange { .. }) => {
                info!(page, "feed has no more pages");
                if page == 0 {
                    self.initial_loading = false;
                    self.list.push_status(self.load_more.status_row());
                }
                self.load_error = None;
                self.load_more.no_more(&mut self.list);
            }
            Err(e) => {
                warn!(page, error = %e, "page failed");
                if page == 0 {
                    self.initial_loading = false;
                    self.error = Some(e.user_message());
                } else {
                    self.load_error = Some(e.user_message());
                    self.load_more.failure(&mut self.list);
                }
            }
        }
    }

    fn spawn_page_fetch(&mut self, page: usize) {
        let source = self.source.clone();
        let tx = self.result_tx.clone();
        let generation = self.generation;

        let task_desc = if page == 0 {
            "Load first page".to_string()
        } else {
            format!("Load page {}", page + 1)
        };
        let task_id = self.debug.start_task(task_desc);

        tokio::spawn(async move {
            let result = source.fetch_page(page).await;
            let _ = tx
                .send(PageResult {
                    generation,
                    task_id,
                    page,
                    result,
                })
                .await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_list::Row;
    use crate::source::FeedItem;
    use crate::test_utils::{TestAppBuilder, sample_items};
    use loadmore::FULL_SPAN;

    fn page(ids: std::ops::Range<u64>, has_more: bool) -> Result<Page, SourceError> {
        Ok(Page {
            items: sample_items(ids),
            has_more,
        })
    }

    fn result_for(app: &App, page: usize, result: Result<Page, SourceError>) -> PageResult {
        PageResult {
            generation: app.generation,
            task_id: 0,
            page,
            result,
        }
    }

    #[test]
    fn new_app_is_wired_to_controller() {
        let app = TestAppBuilder::new().build();
        assert!(app.load_more.is_attached());
        assert!(app.load_more.has_listener());
        assert_eq!(app.load_more.span_size(), FULL_SPAN);
        assert_eq!(app.status_view, LoadState::Completed);
    }

    #[test]
    fn first_page_appends_status_row() {
        let mut app = TestAppBuilder::new().items(0).without_status_row().build();
        app.initial_loading = true;

        let result = result_for(&app, 0, page(0..3, true));
        app.handle_page_result(result);
        app.rebind_rows();

        assert!(!app.initial_loading);
        assert_eq!(app.list.len(), 4);
        assert_eq!(
            app.list.rows()[3],
            Row::Status(app.load_more.status_row())
        );
        assert_eq!(app.next_page, 1);
        assert_eq!(app.status_view, LoadState::Completed);
    }

    #[test]
    fn first_page_failure_shows_error() {
        let mut app = TestAppBuilder::new().items(0).without_status_row().build();
        let result = result_for(&app, 0, Err(SourceError::Unavailable { page: 0 }));
        app.handle_page_result(result);

        assert_eq!(app.error.as_deref(), Some("Could not load page 1."));
        assert!(app.list.is_empty());
    }

    #[tokio::test]
    async fn reaching_the_end_loads_the_next_page() {
        let mut app = TestAppBuilder::new().items(5).viewport_height(30).build();

        app.update(Message::SelectLast).unwrap();
        assert!(app.load_more.is_loading());
        // The row is refreshed on the next turn, not inside the key handler.
        assert_eq!(app.status_view, LoadState::Completed);

        app.pump();
        assert_eq!(app.status_view, LoadState::Loading);
        // Nothing is fetched until the loading row has been drawn.
        assert!(app.debug.running_tasks.is_empty());

        app.pump();
        assert_eq!(app.debug.running_tasks.len(), 1);
        assert_eq!(app.debug.running_tasks[0].description, "Load page 2");

        let result = app.result_rx.recv().await.unwrap();
        assert_eq!(result.page, 1);
        app.handle_page_result(result);
        app.rebind_rows();

        assert_eq!(app.status_view, LoadState::Completed);
        assert_eq!(app.list.item_len(), 5 + app.source.config().page_size);
        assert_eq!(app.list.status_position(), Some(app.list.len() - 1));
        assert_eq!(app.next_page, 2);
    }

    #[test]
    fn scrolling_up_does_not_load() {
        let mut app = TestAppBuilder::new()
            .items(5)
            .viewport_height(30)
            .selected(5)
            .build();
        app.update(Message::SelectPrev).unwrap();
        assert!(!app.load_more.is_loading());
        assert!(app.ui_rx.try_recv().is_err());
    }

    #[test]
    fn scrolls_while_loading_are_ignored() {
        let mut app = TestAppBuilder::new()
            .items(5)
            .viewport_height(30)
            .state(LoadState::Loading)
            .selected(4)
            .build();
        app.update(Message::SelectNext).unwrap();
        assert!(app.ui_rx.try_recv().is_err());
    }

    #[test]
    fn last_page_marks_no_more() {
        let mut app = TestAppBuilder::new()
            .items(5)
            .state(LoadState::Loading)
            .build();
        let result = result_for(&app, 1, page(5..8, false));
        app.handle_page_result(result);
        app.rebind_rows();

        assert_eq!(app.load_more.state(), LoadState::NoMore);
        assert_eq!(app.status_view, LoadState::NoMore);
        assert_eq!(app.list.rows()[7], Row::Item(FeedItem::new(7)));
    }

    #[test]
    fn failed_page_then_retry() {
        let mut app = TestAppBuilder::new()
            .items(5)
            .state(LoadState::Loading)
            .build();
        let result = result_for(&app, 1, Err(SourceError::Unavailable { page: 1 }));
        app.handle_page_result(result);
        app.rebind_rows();

        assert_eq!(app.status_view, LoadState::Failure);
        assert_eq!(app.load_error.as_deref(), Some("Could not load page 2."));

        app.update(Message::Retry).unwrap();
        assert!(app.load_more.is_loading());
        assert!(app.load_error.is_none());
        assert_eq!(app.ui_rx.try_recv(), Ok(UiTask::RefreshThenNotify));
    }

    #[tokio::test]
    async fn retried_page_resolves_failure_row() {
        let mut app = TestAppBuilder::new()
            .items(5)
            .state(LoadState::Failure)
            .load_error("Could not load page 2.")
            .build();
        assert_eq!(app.status_view, LoadState::Failure);

        app.update(Message::Retry).unwrap();
        app.pump();
        assert_eq!(app.status_view, LoadState::Loading);
        app.pump();

        let result = app.result_rx.recv().await.unwrap();
        app.handle_page_result(result);
        app.rebind_rows();

        assert!(!app.load_more.is_loading());
        assert_eq!(app.status_view, LoadState::Completed);
        assert!(app.load_error.is_none());
        assert_eq!(app.list.item_len(), 10);
    }

    #[test]
    fn exhausted_feed_stays_at_no_more() {
        let mut app = TestAppBuilder::new()
            .items(15)
            .state(LoadState::NoMore)
            .viewport_height(30)
            .selected(14)
            .build();
        app.next_page = app.source.config().max_pages;

        app.update(Message::SelectNext).unwrap();
        app.pump();
        assert_eq!(app.status_view, LoadState::Loading);
        app.pump();

        assert!(app.debug.running_tasks.is_empty());
        assert_eq!(app.load_more.state(), LoadState::NoMore);
        assert_eq!(app.status_view, LoadState::NoMore);
        assert!(app.load_error.is_none());
    }

    #[test]
    fn out_of_range_page_is_not_a_failure() {
        let mut app = TestAppBuilder::new()
            .items(5)
            .state(LoadState::Loading)
            .build();
        let result = result_for(&app, 1, Err(SourceError::OutOfRange { page: 1 }));
        app.handle_page_result(result);
        app.rebind_rows();

        assert_eq!(app.status_view, LoadState::NoMore);
        assert!(app.load_error.is_none());
    }

    #[test]
    fn empty_feed_shows_no_more_row() {
        let mut app = TestAppBuilder::new()
            .items(0)
            .without_status_row()
            .initial_loading()
            .build();
        let result = result_for(&app, 0, Err(SourceError::OutOfRange { page: 0 }));
        app.handle_page_result(result);
        app.rebind_rows();

        assert!(!app.initial_loading);
        assert!(app.error.is_none());
        assert_eq!(app.list.status_position(), Some(0));
        assert_eq!(app.status_view, LoadState::NoMore);
    }

    #[test]
    fn retry_is_ignored_unless_failed() {
        let mut app = TestAppBuilder::new().items(5).build();
        app.update(Message::Retry).unwrap();
        assert!(!app.load_more.is_loading());
        assert!(app.ui_rx.try_recv().is_err());
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut app = TestAppBuilder::new()
            .items(5)
            .state(LoadState::Loading)
            .build();
        let mut result = result_for(&app, 1, page(5..10, true));
        result.generation = app.generation.wrapping_sub(1);
        app.handle_page_result(result);

        assert_eq!(app.list.item_len(), 5);
        assert!(app.load_more.is_loading());
    }

    #[tokio::test]
    async fn reload_resets_and_refetches() {
        let mut app = TestAppBuilder::new()
            .items(5)
            .state(LoadState::NoMore)
            .build();
        let generation = app.generation;

        app.update(Message::Reload).unwrap();
        assert_eq!(app.generation, generation + 1);
        assert!(app.list.is_empty());
        assert!(app.initial_loading);
        assert_eq!(app.load_more.state(), LoadState::Completed);

        let result = app.result_rx.recv().await.unwrap();
        assert_eq!(result.page, 0);
        app.handle_page_result(result);
        app.rebind_rows();
        assert_eq!(app.list.item_len(), app.source.config().page_size);
        assert_eq!(app.status_view, LoadState::Completed);
    }

    #[test]
    fn debug_pane_shrinks_viewport() {
        let mut app = TestAppBuilder::new().viewport_height(30).build();
        assert_eq!(app.viewport_lines(), 27);
        app.update(Message::ToggleDebug).unwrap();
        assert_eq!(app.viewport_lines(), 17);
        assert_eq!(app.list.viewport(), 17);
    }

    #[test]
    fn viewport_is_empty_before_first_resize() {
        let app = TestAppBuilder::new().build();
        assert_eq!(app.viewport_lines(), 0);
    }

    #[test]
    fn debug_log_is_bounded() {
        let mut debug = DebugState::new();
        for i in 0..60 {
            debug.log(format!("line {i}"));
        }
        assert_eq!(debug.log.len(), DebugState::MAX_LOG_ENTRIES);
        assert_eq!(debug.log.front().unwrap().message, "line 10");
    }
}
