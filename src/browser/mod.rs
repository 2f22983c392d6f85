//! Running captures against a live page in Chrome/Chromium

pub mod config;
pub mod page;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::{ChromeElement, ChromePage};
pub use session::{BrowserSession, normalize_url};
