//! Workout results mapping.

use std::collections::BTreeMap;

/// A user's recorded workout results, keyed by workout name.
///
/// Loaded at most once per sign-in and replaced wholesale on every save;
/// the last writer wins. There is no merge and no partial update.
pub type Wods = BTreeMap<String, String>;
