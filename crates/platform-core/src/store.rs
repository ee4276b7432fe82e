//! Persistence boundary.

use clipper_common::error::ClipperResult;

/// External key-value store used to remember the user's device choice.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> ClipperResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> ClipperResult<()>;
}
