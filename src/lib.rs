// Core typing engine plus the terminal front end. main.rs drives the terminal;
// benches and integration tests import through this crate root.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod event;
pub mod profile;
pub mod session;
pub mod store;
pub mod ui;
