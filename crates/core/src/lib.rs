//! Domain building blocks shared by every `folio` crate.
//!
//! - [`project`] -- the project record and its editable field set.
//! - [`ordering`] -- recency ordering applied to every snapshot.
//! - [`media`] -- upload limits and `data:` URI encoding.
//! - [`auth`] -- signed-in identity and sign-in failure mapping.
//! - [`prompts`] -- prompt builders for the generative service.
//! - [`notice`] -- user-visible notices and their fixed texts.

pub mod auth;
pub mod error;
pub mod media;
pub mod notice;
pub mod ordering;
pub mod project;
pub mod prompts;
pub mod types;
