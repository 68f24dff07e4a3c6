use crate::error::{DemuxError, Result};
use std::env;

/// Default cap of the per-stream alignment scratch buffer.
pub const DEFAULT_ALIGN_BUFFER_CAP: usize = 256 * 1024;

/// Default output time base (ticks per second).
pub const DEFAULT_TIME_BASE: u64 = 1_000_000;

/// Default upper bound for a single buffered PES unit.
pub const DEFAULT_MAX_PES_SIZE: usize = 4 * 1024 * 1024;

const ENV_ALIGN_BUFFER_CAP: &str = "TSDEMUX_ALIGN_BUFFER_CAP";
const ENV_TIME_BASE: &str = "TSDEMUX_TIME_BASE";
const ENV_MAX_PES_SIZE: &str = "TSDEMUX_MAX_PES_SIZE";

/// Runtime settings shared by every stream of a [`Demultiplexer`](crate::format::ts::Demultiplexer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemuxConfig {
    /// Maximum number of bytes kept while searching for codec frame boundaries.
    /// Exceeding it discards the scratch buffer.
    pub align_buffer_cap: usize,
    /// Ticks per second of emitted timestamps.
    pub time_base: u64,
    /// Maximum size of a PES unit being collected from transport packets.
    pub max_pes_size: usize,
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            align_buffer_cap: DEFAULT_ALIGN_BUFFER_CAP,
            time_base: DEFAULT_TIME_BASE,
            max_pes_size: DEFAULT_MAX_PES_SIZE,
        }
    }
}

impl DemuxConfig {
    /// Builds a configuration from the defaults, overridden by the
    /// `TSDEMUX_ALIGN_BUFFER_CAP`, `TSDEMUX_TIME_BASE` and
    /// `TSDEMUX_MAX_PES_SIZE` environment variables when present.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var(ENV_ALIGN_BUFFER_CAP) {
            config.align_buffer_cap = value.trim().parse()?;
        }
        if let Ok(value) = env::var(ENV_TIME_BASE) {
            config.time_base = value.trim().parse()?;
        }
        if let Ok(value) = env::var(ENV_MAX_PES_SIZE) {
            config.max_pes_size = value.trim().parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the alignment buffer cap.
    pub fn with_align_buffer_cap(mut self, cap: usize) -> Self {
        self.align_buffer_cap = cap;
        self
    }

    /// Sets the output time base.
    pub fn with_time_base(mut self, time_base: u64) -> Self {
        self.time_base = time_base;
        self
    }

    /// Sets the PES unit size limit.
    pub fn with_max_pes_size(mut self, size: usize) -> Self {
        self.max_pes_size = size;
        self
    }

    /// Rejects settings the demultiplexer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.time_base == 0 {
            return Err(DemuxError::Config("time base must be non-zero".into()));
        }
        if self.align_buffer_cap == 0 {
            return Err(DemuxError::Config(
                "alignment buffer cap must be non-zero".into(),
            ));
        }
        if self.max_pes_size == 0 {
            return Err(DemuxError::Config("PES size limit must be non-zero".into()));
        }
        Ok(())
    }
}
