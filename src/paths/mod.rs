//! Filesystem path helpers shared by the resolver and the URL rewriter.
//!
//! Containment checks live in one place so that serving, naming and rewriting all reason
//! about "is this file inside that directory" the same way.

mod canonical;
mod metadata;
mod search;

pub use canonical::{canonical_dir, has_traversal, is_descendant, resolve_within};
pub use metadata::{modification_time, read_file};
pub use search::{DEFAULT_SEARCH_PREFIX, SearchPath, join_prefix};
