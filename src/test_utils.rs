//! Test data builders for app and view testing.

use std::ops::Range;
use std::time::Duration;

use loadmore::LoadState;

use crate::app::{App, Message};
use crate::feed_list::LayoutKind;
use crate::source::{FeedItem, PagedSource, SourceConfig};
use crate::theme::{ResolvedTheme, ThemeVariant, default_for_variant};

/// Items with ids in `ids`, as a page fetch would produce them.
pub fn sample_items(ids: Range<u64>) -> Vec<FeedItem> {
    ids.map(FeedItem::new).collect()
}

/// Small, instant source so spawned fetches finish on the first yield.
pub fn test_source() -> PagedSource {
    PagedSource::new(SourceConfig {
        page_size: 5,
        max_pages: 3,
        latency: Duration::ZERO,
        fail_every: None,
    })
}

pub struct TestAppBuilder {
    kind: LayoutKind,
    columns: usize,
    items: u64,
    with_status: bool,
    state: LoadState,
    viewport_height: Option<u16>,
    selected: usize,
    show_help: bool,
    show_debug: bool,
    error: Option<String>,
    load_error: Option<String>,
    initial_loading: bool,
    theme: ResolvedTheme,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            kind: LayoutKind::Linear,
            columns: 3,
            items: 5,
            with_status: true,
            state: LoadState::Completed,
            viewport_height: None,
            selected: 0,
            show_help: false,
            show_debug: false,
            error: None,
            load_error: None,
            initial_loading: false,
            theme: default_for_variant(ThemeVariant::Dark),
        }
    }

    pub fn layout(mut self, kind: LayoutKind, columns: usize) -> Self {
        self.kind = kind;
        self.columns = columns;
        self
    }

    pub fn items(mut self, count: u64) -> Self {
        self.items = count;
        self
    }

    pub fn without_status_row(mut self) -> Self {
        self.with_status = false;
        self
    }

    pub fn state(mut self, state: LoadState) -> Self {
        self.state = state;
        self
    }

    pub fn viewport_height(mut self, height: u16) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }

    pub fn show_help(mut self) -> Self {
        self.show_help = true;
        self
    }

    pub fn show_debug(mut self) -> Self {
        self.show_debug = true;
        self
    }

    pub fn error(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn load_error(mut self, msg: &str) -> Self {
        self.load_error = Some(msg.to_string());
        self
    }

    pub fn initial_loading(mut self) -> Self {
        self.initial_loading = true;
        self
    }

    pub fn theme(mut self, theme: ResolvedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn build(self) -> App {
        let mut app = App::new(self.theme, test_source(), self.kind, self.columns);

        app.list.insert_items(sample_items(0..self.items));
        if self.with_status {
            app.list.push_status(app.load_more.status_row());
        }
        if self.items > 0 {
            app.next_page = 1;
        }

        match self.state {
            LoadState::Completed => app.load_more.completed(&mut app.list),
            LoadState::NoMore => app.load_more.no_more(&mut app.list),
            LoadState::Failure => app.load_more.failure(&mut app.list),
            LoadState::Loading => app.load_more.start_load(&mut app.list),
        }
        // Settle the state without running the listener.
        while app.ui_rx.try_recv().is_ok() {}
        app.list.take_dirty();
        app.status_view = app.load_more.state();

        if self.show_debug {
            app.debug.visible = true;
        }
        if let Some(height) = self.viewport_height {
            // Viewport messages never touch the controller.
            let _ = app.update(Message::UpdateViewportHeight(height));
        }
        app.list.select(self.selected);

        app.show_help = self.show_help;
        app.error = self.error;
        app.load_error = self.load_error;
        app.initial_loading = self.initial_loading;
        app
    }
}
