use crate::error::{DemuxError, Result};

/// A bit-level reader for parsing codec headers.
///
/// Bits are consumed most-significant first. The reader is bounded by a
/// declared bit length (never more than the backing slice holds); any read
/// past it fails with [`DemuxError::Bitstream`] instead of touching memory
/// outside the slice.
///
/// Example:
/// ```
/// use tsdemux::utils::BitReader;
///
/// let data = [0b10110011];
/// let mut reader = BitReader::new(&data);
///
/// assert_eq!(reader.read_bit().unwrap(), true);    // 1
/// assert_eq!(reader.show_bits(3).unwrap(), 0b011); // peek
/// assert_eq!(reader.read_bits(3).unwrap(), 0b011); // 011
/// ```
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_offset: usize,
    bit_offset: u8,
    bit_len: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader spanning the whole slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_bit_len(data, data.len() * 8)
    }

    /// Creates a reader limited to `bit_len` bits of `data`.
    ///
    /// A length beyond the end of the slice is clamped to the slice.
    pub fn with_bit_len(data: &'a [u8], bit_len: usize) -> Self {
        BitReader {
            data,
            byte_offset: 0,
            bit_offset: 0,
            bit_len: bit_len.min(data.len() * 8),
        }
    }

    /// Current position in bits from the start of the buffer.
    pub fn position(&self) -> usize {
        self.byte_offset * 8 + self.bit_offset as usize
    }

    /// Reads a single bit from the stream.
    /// Returns true for 1, false for 0.
    ///
    /// Returns error if the declared length is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.position() >= self.bit_len {
            return Err(DemuxError::Bitstream("Reached end of data".into()));
        }

        let bit = (self.data[self.byte_offset] >> (7 - self.bit_offset)) & 1;
        self.bit_offset += 1;

        if self.bit_offset == 8 {
            self.bit_offset = 0;
            self.byte_offset += 1;
        }

        Ok(bit == 1)
    }

    /// Reads n bits and returns them as a number.
    /// The bits are interpreted as big-endian.
    ///
    /// Returns error if n > 32 or fewer than n bits remain. Nothing is
    /// consumed on error.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        if n > 32 {
            return Err(DemuxError::Bitstream("Too many bits requested".into()));
        }
        if n as usize > self.available_bits() {
            return Err(DemuxError::Bitstream(format!(
                "Requested {} bits with {} left",
                n,
                self.available_bits()
            )));
        }

        let mut value = 0u64;
        for _ in 0..n {
            value = (value << 1) | self.read_bit()? as u64;
        }

        Ok(value as u32)
    }

    /// Returns the next n bits without consuming them.
    pub fn show_bits(&self, n: u32) -> Result<u32> {
        self.clone().read_bits(n)
    }

    /// Skips n bits in the stream.
    pub fn skip_bits(&mut self, n: u32) -> Result<()> {
        if n as usize > self.available_bits() {
            return Err(DemuxError::Bitstream(format!(
                "Cannot skip {} bits with {} left",
                n,
                self.available_bits()
            )));
        }
        let target = self.position() + n as usize;
        self.byte_offset = target / 8;
        self.bit_offset = (target % 8) as u8;
        Ok(())
    }

    /// Returns number of bits available to read.
    pub fn available_bits(&self) -> usize {
        self.bit_len.saturating_sub(self.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_read_bits() {
        // Simple pattern within a byte
        let data = [0b10110011];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(5).unwrap(), 0b10011);

        // Cross-byte boundary
        let data = [0b10110011, 0b01011010];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(8).unwrap(), 0b10011010);

        // Zero bits
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(0).unwrap(), 0);

        // Full 32 bits
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(32).unwrap(), 0xDEADBEEF);

        // More than 32 bits
        let mut reader = BitReader::new(&data);
        assert!(reader.read_bits(33).is_err());
    }

    #[test]
    fn test_show_bits_does_not_consume() {
        let data = [0x0B, 0x77, 0x12];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.show_bits(16).unwrap(), 0x0B77);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_bits(16).unwrap(), 0x0B77);
        assert_eq!(reader.show_bits(8).unwrap(), 0x12);
        assert!(reader.show_bits(9).is_err());
    }

    #[test]
    fn test_skip_bits() {
        let data = [0b10110011, 0b01011010];
        let mut reader = BitReader::new(&data);

        reader.skip_bits(3).unwrap();
        assert_eq!(reader.read_bits(5).unwrap(), 0b10011);
        assert!(reader.skip_bits(9).is_err());
        assert_eq!(reader.read_bits(8).unwrap(), 0b01011010);
    }

    #[test]
    fn test_declared_length_bounds_reads() {
        let data = [0xFF, 0xFF, 0xFF];
        let mut reader = BitReader::with_bit_len(&data, 12);
        assert_eq!(reader.available_bits(), 12);
        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
        assert!(reader.read_bits(5).is_err());
        // failed read leaves the cursor untouched
        assert_eq!(reader.read_bits(4).unwrap(), 0xF);
        assert!(reader.read_bit().is_err());

        // length beyond the slice is clamped
        let reader = BitReader::with_bit_len(&data, 1000);
        assert_eq!(reader.available_bits(), 24);
    }

    #[quickcheck]
    fn prop_read_bits_matches_manual(data: Vec<u8>, n: u8) -> bool {
        let n = (n % 33) as u32;
        let mut reader = BitReader::new(&data);

        match reader.read_bits(n) {
            Ok(result) => {
                let mut expected = 0u64;
                for i in 0..n as usize {
                    let bit = (data[i / 8] >> (7 - (i % 8))) & 1;
                    expected = (expected << 1) | bit as u64;
                }
                result as u64 == expected
            }
            Err(_) => (n as usize) > data.len() * 8,
        }
    }
}
