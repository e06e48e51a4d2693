//! Application-level configuration constants.

use log::LevelFilter;

// Logging
pub const LOG_LEVEL: LevelFilter = if cfg!(debug_assertions) {
    LevelFilter::Debug
} else {
    LevelFilter::Info
};

// File picker
pub const ACCEPTED_MIME: &str = "image/*";

// Cursor overlay
pub const CURSOR_CLASS: &str = "cursor-overlay";
pub const CURSOR_COLOR: &str = "rgba(255, 105, 180, 0.7)";
pub const CURSOR_SIZE_PX: i32 = 40;
pub const CURSOR_PRESSED_SCALE: f64 = 0.6;
pub const CURSOR_Z_INDEX: &str = "9999";

// Copy
pub const APP_TITLE: &str = "GAYDAR";
pub const WELCOME_HEADING: &str = "Welcome to GAYDAR";
pub const WELCOME_TAGLINE: &str = "Upload a photo to check their gayness level!";
pub const WELCOME_BUTTON: &str = "Get Started";
pub const UPLOAD_PROMPT_BOLD: &str = "Click to upload";
pub const UPLOAD_PROMPT_REST: &str = " or drag and drop";
pub const ANALYZING_MESSAGE: &str = "Our AI is analyzing the image...";
pub const ANALYZING_HINT: &str = "Please wait";
pub const RESULT_HEADING: &str = "GAYNESS LEVEL";
pub const RESET_BUTTON: &str = "Try Again";
