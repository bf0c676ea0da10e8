//! Weave: pchtxt to IPS32 patch conversion.
//!
//! The crate provides:
//! - A pchtxt parser (`pchtxt`)
//! - The IPS32 container encoder/decoder (`ips32`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use weave::{ips32, pchtxt};
//!
//! let parsed = pchtxt::parse_str("@nsobid 1A2B3C\n@enabled\n100 DEADBEEF\n");
//! assert_eq!(parsed.binary_id.as_deref(), Some("1A2B3C"));
//!
//! let container = ips32::encode_records(&parsed.records).unwrap();
//! assert_eq!(&container[..5], b"IPS32");
//! assert_eq!(ips32::decode_all(&container).unwrap(), parsed.records);
//! ```

pub mod io;
pub mod ips32;
pub mod pchtxt;

#[cfg(feature = "cli")]
pub mod cli;
