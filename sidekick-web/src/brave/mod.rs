mod client;
mod types;

pub use client::BraveSearchClient;
pub use types::SearchHit;
