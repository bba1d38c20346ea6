//! Data ingestion and normalization for the news-labeler system.
//!
//! This crate handles:
//! - Daily date normalization
//! - Per-symbol price history loading (column detection, OHLC renaming)
//! - News event loading
//! - Writing labeled output and normalized price windows

pub mod dates;
pub mod event_loader;
pub mod price_loader;
pub mod sink;
pub mod windows;

pub use dates::parse_daily_date;
pub use event_loader::{distinct_symbols, load_events};
pub use price_loader::{load_price_book, load_series, PriceBook};
pub use sink::write_labels;
pub use windows::{read_price_windows, write_window_rows};
