//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Commands that end in
//! a user-visible message add a `notice` next to it.

use folio_core::notice::Notice;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "notice": {level, message} }` for commands that report back.
#[derive(Debug, Serialize)]
pub struct NoticeResponse<T: Serialize> {
    pub data: T,
    pub notice: Notice,
}

impl<T: Serialize> NoticeResponse<T> {
    pub fn new(data: T, notice: Notice) -> Self {
        Self { data, notice }
    }
}
