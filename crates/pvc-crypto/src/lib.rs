//! Cryptographic primitives for PVC.
//!
//! Object identity is the SHA-1 digest of the uncompressed, framed record
//! (`<type> <len>\0<payload>`). Hashing never covers the payload alone and
//! never the compressed bytes, so ids are independent of compression level.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod hasher;

pub use hasher::ContentHasher;
