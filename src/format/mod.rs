//! Container formats.
//!
//! Only MPEG transport streams are handled; see [`ts`].

/// MPEG transport stream demultiplexing
pub mod ts;
