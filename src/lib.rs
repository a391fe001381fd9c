//! Terminal preview of headless-CMS content.
//!
//! Content records are fetched from the CMS API (or read from a JSON
//! snapshot), grouped by [`preview::build`] into the tree the mobile app
//! renders, and browsed through a [`navigation::NavigationStack`] in the TUI.

pub mod app;
pub mod config;
pub mod content;
pub mod navigation;
pub mod preview;
pub mod theme;
pub mod ui;
pub mod util;
