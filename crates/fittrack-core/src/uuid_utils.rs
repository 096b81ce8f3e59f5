//! UUIDv7 identifiers.
//!
//! Every row id in fittrack is a UUIDv7, so ids sort by creation time.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// ```
/// use fittrack_core::uuid_utils::new_v7;
///
/// let first = new_v7();
/// let second = new_v7();
/// assert!(second >= first);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}
