//! External service integrations
//!
//! Collaborators the workflow consumes but does not own: the push
//! notification channel and the bill-image file storage. Both are injected
//! through `AppState` rather than reached as globals.

pub mod push;
pub mod storage;
