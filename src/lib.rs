//! MD5 message digests in pure Rust.
//!
//! ```rust
//! let digest = qzoke::Digest::compute(b"abc");
//! assert_eq!(digest.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
//! assert_eq!(qzoke::md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
//! ```

pub mod cs;

pub use cs::error::{Error, Result};
pub use cs::security;
pub use cs::security::*;
