#![doc(html_root_url = "https://docs.rs/tsdemux/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # tsdemux - MPEG-TS elementary stream demultiplexer
//!
//! `tsdemux` splits an MPEG-2 transport stream into the elementary streams it
//! carries. Transport packets go in, reassembled and timestamped codec
//! payloads come out.
//!
//! ## Features
//!
//! - PES reassembly with PTS/DTS extraction
//! - Frame realignment for audio streams whose PES units do not start on a
//!   frame boundary
//! - AC-3 and E-AC-3 header parsing (channels, sample rate, bit rate)
//! - Overflow-safe conversion of 90 kHz timestamps to the output time base
//! - Per PID locking, so different streams can be fed from different threads
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tsdemux = "0.1.0"
//! ```
//!
//! ```rust,no_run
//! use std::io::Read;
//! use std::sync::Arc;
//! use tsdemux::av::{CodecType, StreamDescriptor, StreamPacket, StreamSink};
//! use tsdemux::format::ts::{Demultiplexer, TS_PACKET_SIZE};
//! use tsdemux::{DemuxConfig, DemuxError};
//!
//! struct Printer;
//!
//! impl StreamSink for Printer {
//!     fn send_stream_packet(&self, packet: StreamPacket) {
//!         println!("pid {} pts {} ({} bytes)", packet.pid, packet.pts, packet.len());
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut demux = Demultiplexer::new(Arc::new(Printer), DemuxConfig::from_env()?)?;
//!     demux.add_stream(StreamDescriptor::new(0x44, CodecType::AC3))?;
//!
//!     let mut input = std::fs::File::open("capture.ts")?;
//!     let mut packet = [0u8; TS_PACKET_SIZE];
//!     while input.read_exact(&mut packet).is_ok() {
//!         match demux.process_ts_packet(&packet) {
//!             Ok(()) | Err(DemuxError::TransportError { .. }) => {}
//!             Err(e) => return Err(e.into()),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - `av`: stream descriptors, packets, metadata and the output sink trait
//! - `codec`: codec header parsers (AC-3 family)
//! - `format`: the transport stream demultiplexer
//! - `config`: runtime settings
//! - `error`: error type and result alias
//! - `utils`: bitstream reader

/// Stream and packet types shared across the crate
pub mod av;

/// Codec header parsers
pub mod codec;

/// Error types and utilities
pub mod error;

/// Container format implementations
pub mod format;

/// Common utilities and helper functions
pub mod utils;

/// Configuration module
pub mod config;

pub use config::DemuxConfig;
pub use error::{DemuxError, Result};
