//! Web discovery and acquisition tools.
//!
//! - Brave Search API client (`brave`)
//! - Screenshot capture over WebDriver (`capture`)
//! - Concurrent, bounded page fetching (`batch`)
//! - HTML title/text extraction (`extract`)
//! - Model-backed screenshot checks (`verify`)
//!
//! The tools are independent: each takes its own section of the resolved
//! [`sidekick_common::Settings`] and none requires the others.

pub mod batch;
pub mod brave;
pub mod capture;
pub mod extract;
pub mod verify;
