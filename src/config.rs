//! Application-level configuration constants.

// UI Behavior
pub const DEBOUNCE_MS: u32 = 300;
/// Base URL the pack files are fetched relative to; empty means the page origin.
pub const PACKS_BASE_URL: &str = "";

// Min limit for the draw-count input
pub const MIN_DRAW_COUNT: usize = 1;

// Carousel
pub const CAROUSEL_SCROLL_PX: f64 = 240.0;

// Logging
pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
