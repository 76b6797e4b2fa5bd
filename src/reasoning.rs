//! Reasoning adapter
//!
//! Wraps the reasoning backend and normalizes whatever it returns into a
//! well-formed [`Reply`]. Backend failures never escape: unreachable backends
//! get a keyword-based fallback, malformed output is salvaged or truncated.

mod adapter;
mod fallback;
mod parse;
mod reply;


pub use adapter::ReasoningAdapter;
pub use reply::Reply;

use async_trait::async_trait;

/// Turns recognized user text into the companion's reply
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Always yields a reply; implementations recover from their own failures
    async fn converse(&self, input_text: &str) -> Reply;
}
