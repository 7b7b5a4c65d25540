//! Help text generated from keymaps.

use crate::app::Message;
use crate::keys::{Keymap, format_key};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    label: &'static str,
}

impl HelpItem {
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Paired actions, e.g. j/k for next/prev.
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        (!keys.is_empty()).then(|| keys.join("/"))
    }

    /// `keys:label`, or None if nothing is bound.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap)
            .map(|keys| format!("{}:{}", keys, self.label))
    }

    /// Returns (`keys_string`, label) or None if no keys are bound.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|keys| (keys, self.label))
    }
}

pub struct HelpConfig {
    pub expanded: Vec<HelpItem>,
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Status bar help for the feed.
pub fn feed_help() -> HelpConfig {
    use Message::{
        PageDown, PageUp, Quit, Reload, Retry, SelectFirst, SelectLast, SelectNext, SelectPrev,
        ToggleDebug, ToggleHelp,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
            HelpItem::pair(PageDown, PageUp, "page"),
            HelpItem::new(Retry, "retry"),
            HelpItem::new(Reload, "reload"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "hide"),
        ],
        compact: vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::new(Retry, "retry"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

/// Rows of the help overlay.
pub fn feed_overlay_items() -> Vec<HelpItem> {
    use Message::{
        PageDown, PageUp, Quit, Reload, Retry, SelectFirst, SelectLast, SelectNext, SelectPrev,
        ToggleDebug, ToggleHelp,
    };
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::pair(PageDown, PageUp, "page down/up"),
        HelpItem::new(Retry, "retry failed page"),
        HelpItem::new(Reload, "reload from first page"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}
