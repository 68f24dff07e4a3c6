//! # MPEG Transport Stream (TS) Demultiplexing
//!
//! Turns 188 byte transport packets into timestamped elementary stream
//! packets:
//!
//! - TS packet header and adaptation field parsing
//! - PES unit collection and header parsing (PTS/DTS)
//! - Frame realignment for streams without data alignment
//! - 90 kHz to output time base conversion
//! - Per PID dispatch
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use tsdemux::av::{CodecType, StreamDescriptor, StreamPacket, StreamSink};
//! use tsdemux::format::ts::{Demultiplexer, TS_PACKET_SIZE};
//! use tsdemux::DemuxConfig;
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<StreamPacket>>);
//!
//! impl StreamSink for Collect {
//!     fn send_stream_packet(&self, packet: StreamPacket) {
//!         self.0.lock().push(packet);
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = Arc::new(Collect::default());
//! let mut demux = Demultiplexer::new(sink.clone(), DemuxConfig::default())?;
//! demux.add_stream(StreamDescriptor::new(0x100, CodecType::AC3))?;
//!
//! // a packet of a PID nobody registered
//! let mut packet = vec![0xFFu8; TS_PACKET_SIZE];
//! packet[..4].copy_from_slice(&[0x47, 0x02, 0x00, 0x10]);
//! demux.process_ts_packet(&packet)?;
//! assert!(sink.0.lock().is_empty());
//! # Ok(())
//! # }
//! ```

/// Frame boundary search for unaligned streams
pub mod align;

/// Per PID stream state and the PID registry
pub mod demuxer;

/// TS packet header parsing
pub mod parser;

/// PES unit collection and header parsing
pub mod pes;

/// PES units to access units
pub mod pes_parser;

/// Timestamp conversion
pub mod timestamp;

/// Core TS types and constants
pub mod types;

pub use align::{find_aligned_run, find_alignment_offset, AlignmentBuffer};
pub use demuxer::{Demultiplexer, StreamDemuxer, SubtitlingInfo};
pub use pes::{pes_get_dts, pes_get_pts, PesAssembler, PesHeader, MAX_PES_SLICE};
pub use pes_parser::{ParsedPayload, PesParser, TimestampTracker};
pub use timestamp::{rescale, Rescaler};
pub use types::*;
