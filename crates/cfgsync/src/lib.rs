//! Comment-preserving configuration synchronizer.
//!
//! Given a shipped default document and a user's edited copy of the same
//! schema, cfgsync produces an updated document that:
//!
//! - keeps the user's values wherever their type matches the default
//! - follows the default's key order and carries its comments
//! - leaves *ignored sections* exactly as the user has them
//! - forces *override sections* back to the shipped value
//!
//! The file on disk is rewritten only if the merged text differs from it.
//!
//! # Architecture
//!
//! - [`KeyPathBuilder`]: nesting stack used while scanning raw text
//! - [`CommentIndex`]: comment blocks of the default, keyed by key path
//! - [`IgnoredSections`]: literal snapshots of user-owned subtrees
//! - [`merge`]: the write pass over the default's key enumeration
//! - [`ConfigUpdater`]: file-level entry point with read-compare-write
//!
//! # Example
//!
//! ```rust
//! use cfgsync::merge_documents;
//!
//! let default = "# Listen port\nport: 8080\n# Enable TLS\ntls: false\n";
//! let current = "port: 9000\n";
//!
//! let merged = merge_documents(default, current, &[], &[]).unwrap();
//! assert_eq!(merged, "# Listen port\nport: 9000\n# Enable TLS\ntls: false\n");
//! ```

mod error;
mod keypath;
mod snapshot;
mod updater;

pub mod comments;
pub mod merge;
pub mod resources;
pub mod writer;

pub use comments::CommentIndex;
pub use error::{Result, SyncError};
pub use keypath::KeyPathBuilder;
pub use resources::{
    DirectoryResources,
    EmbeddedResources,
    MemoryResources,
    ResourceProvider,
    Resources,
};
pub use snapshot::{Coverage, IgnoredSections};
pub use updater::{ConfigUpdater, UpdateOutcome, merge_documents};

// Re-export for convenience
pub use cfgsync_yaml::{Document, Value};
