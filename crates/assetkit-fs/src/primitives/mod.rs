mod clear;
mod copy;
mod remove;

pub use clear::{ClearMode, ClearOutcome, clear_dir};
pub use copy::{COPY_BUFFER_SIZE, copy_stream, copy_to_file, ensure_dir, ensure_parent};
pub use remove::{remove_by_prefix, remove_tree};
