pub mod common;
pub mod debug;
pub mod feed;
pub mod help_overlay;
pub mod spinner;
pub mod status_bar;
