#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod algorithm;
mod block;
mod error;
mod hex;
pub mod strong;

pub use algorithm::{DigestAlgorithm, UnknownAlgorithm};
pub use block::{BlockDigest, Crc32Digest, Md5Digest};
pub use error::DigestError;
pub use hex::{encode_hex, encode_hex_into};
