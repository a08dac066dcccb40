//! Driver layer for browser automation.
//!
//! This crate wraps a WebDriver endpoint (chromedriver) behind small typed
//! handles the web tools build on.
//!
//! - [`browser::Driver`]: one WebDriver session, connect through close
//! - [`browser::Page`]: source/title/URL accessors, settle waits, screenshots
//!
//! Every failure here is a navigation error: session creation, unreachable
//! URLs, and load timeouts all report through the same variant so callers can
//! tell browser trouble apart from provider or filesystem trouble.
pub mod browser;
