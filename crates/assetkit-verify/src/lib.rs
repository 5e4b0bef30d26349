//! Content verification primitives for materialized assets.
//!
//! Provides incremental hashing while bytes stream to disk, and whole-file
//! checks used to decide whether an existing copy can be reused.
//!
//! # Example
//!
//! ```
//! use assetkit_verify::Checksum;
//!
//! let checksum = Checksum::md5("5eb63bbbe01eeed093cb22bb8f5acdc3").unwrap();
//! assert!(checksum.matches_bytes(b"hello world"));
//! ```

pub use self::checksum::{Algorithm, Checksum};
pub use self::error::{Result, VerifyError};
pub use self::hasher::{Hasher, Md5Hasher, Sha256Hasher};
pub use self::reader::VerifiedReader;

mod checksum;
mod error;
mod hasher;
mod reader;
