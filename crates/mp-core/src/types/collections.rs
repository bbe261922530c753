//! Hash collection aliases used across the workspace.
//!
//! Keys are object identities, metric keys and type pairs. FxHash is not DoS
//! resistant.

pub use rustc_hash::{FxHashMap, FxHashSet};
