//! Live projections of the remote project collection.
//!
//! [`cache::LiveProjectCache`] is the single subscription the whole process
//! shares. Every reader (the admin console, the public showcase, WebSocket
//! clients) observes it instead of opening its own stream.

pub mod cache;

pub use cache::{CacheState, CacheView, LiveProjectCache};
