//! # AC-3 / Enhanced AC-3 header parsing
//!
//! Both formats share the `0x0B77` sync word and are told apart by the
//! `bsid` field: up to 10 is AC-3, 10 to 16 is E-AC-3.
//!
//! ```rust
//! use tsdemux::codec::ac3;
//!
//! // 48 kHz, 32 kbit/s, bsid 8, stereo
//! let mut frame = vec![0x0B, 0x77, 0x00, 0x00, 0x00, 0x40, 0x40];
//! frame.resize(128, 0);
//!
//! assert_eq!(ac3::check_alignment_header(&frame), Some(128));
//! let info = ac3::parse_payload(&frame).unwrap();
//! assert_eq!(info.sample_rate, 48000);
//! assert_eq!(info.channels, 2);
//! ```

/// Enhanced AC-3 sync frame parsing
pub mod eac3;
/// AC-3 bit stream information parsing
pub mod parser;
/// Tables and constants shared by both formats
pub mod types;


pub use parser::*;
pub use types::*;
