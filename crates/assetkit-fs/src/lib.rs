//! Filesystem primitives used while materializing bundled assets.
//!
//! - `primitives/copy.rs` - Fixed-size chunked stream copy
//! - `primitives/clear.rs` - Top-level directory clearing
//! - `primitives/remove.rs` - Recursive and prefix-based removal

mod error;
mod primitives;

pub use error::{Error, Result};
pub use primitives::{
    COPY_BUFFER_SIZE, ClearMode, ClearOutcome, clear_dir, copy_stream, copy_to_file,
    ensure_dir, ensure_parent, remove_by_prefix, remove_tree,
};
