use crate::codec::CodecParser;
use bytes::BytesMut;
use std::ops::Range;

/// Finds the first frame start at or after `start` whose frame is followed by
/// another frame start, returning its offset and frame size.
///
/// A lone frame filling the whole buffer is accepted as well. A sync pattern
/// whose frame does not lead to another one is taken for a collision inside
/// frame data and the search resumes one byte later.
pub fn find_alignment_offset(
    codec: &CodecParser,
    buffer: &[u8],
    start: usize,
) -> Option<(usize, usize)> {
    if codec.disable_alignment() {
        return None;
    }

    let header_size = codec.header_size();
    let limit = buffer.len().checked_sub(header_size)?;
    let mut offset = start;

    loop {
        // seek sync word
        let mut frame_size = None;
        while offset < limit {
            frame_size = codec.check_alignment_header(&buffer[offset..]);
            if frame_size.is_some() {
                break;
            }
            offset += 1;
        }
        let frame_size = frame_size?;

        // buffer already aligned
        if offset == 0 && frame_size == buffer.len() {
            return Some((0, frame_size));
        }

        if frame_size == 0 {
            return None;
        }

        // frame not complete yet
        if limit <= offset + frame_size {
            return None;
        }

        if codec
            .check_alignment_header(&buffer[offset + frame_size..])
            .is_none()
        {
            offset += 1;
            continue;
        }

        return Some((offset, frame_size));
    }
}

/// Locates the longest run of back-to-back complete frames, starting at the
/// first confirmed frame start.
pub fn find_aligned_run(codec: &CodecParser, buffer: &[u8]) -> Option<Range<usize>> {
    let (start, frame_size) = find_alignment_offset(codec, buffer, 0)?;
    let mut end = start + frame_size;

    while end < buffer.len() {
        match codec.check_alignment_header(&buffer[end..]) {
            Some(size) if size > 0 && end + size <= buffer.len() => {
                log::debug!("Found alignment offset: {} framesize: {}", end, size);
                end += size;
            }
            _ => break,
        }
    }

    Some(start..end)
}

/// Scratch buffer for streams whose PES units do not start on frame
/// boundaries.
#[derive(Debug)]
pub struct AlignmentBuffer {
    buf: BytesMut,
    cap: usize,
}

impl AlignmentBuffer {
    /// An empty buffer holding at most `cap` bytes.
    pub fn new(cap: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            cap,
        }
    }

    /// Bytes collected.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether there is no payload.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discards everything collected.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Appends a payload. Growing past the cap discards what was collected.
    pub fn push(&mut self, payload: &[u8]) {
        if self.buf.len() + payload.len() > self.cap {
            log::error!(
                "alignment buffer overrun ({} bytes). resetting.",
                self.buf.len() + payload.len()
            );
            self.buf.clear();
            if payload.len() > self.cap {
                return;
            }
        }
        self.buf.extend_from_slice(payload);
        log::debug!("Alignbuffer: {} bytes", self.buf.len());
    }

    /// Extracts the next run of whole frames and hands it to `emit`.
    ///
    /// Bytes in front of the run are discarded; anything after it stays for
    /// the next call.
    pub fn take_run<T>(
        &mut self,
        codec: &CodecParser,
        emit: impl FnOnce(&[u8]) -> T,
    ) -> Option<T> {
        let run = find_aligned_run(codec, &self.buf)?;
        let result = emit(&self.buf[run.clone()]);

        let consumed = self.buf.split_to(run.end);
        drop(consumed);
        log::debug!("buffersize after shift: {} bytes", self.buf.len());

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// 128 byte AC-3 frame, 48 kHz stereo.
    fn frame(fill: u8) -> Vec<u8> {
        let mut frame = vec![0x0B, 0x77, 0x00, 0x00, 0x00, 0x40, 0x40];
        frame.resize(128, fill);
        frame
    }

    fn garbage(len: usize) -> Vec<u8> {
        vec![0xAA; len]
    }

    #[test]
    fn test_whole_buffer_single_frame() {
        let buffer = frame(0);
        assert_eq!(
            find_alignment_offset(&CodecParser::Ac3, &buffer, 0),
            Some((0, 128))
        );
    }

    #[test]
    fn test_run_between_garbage() {
        let mut buffer = garbage(10);
        buffer.extend(frame(1));
        buffer.extend(frame(2));
        buffer.extend(garbage(20));

        assert_eq!(
            find_aligned_run(&CodecParser::Ac3, &buffer),
            Some(10..266)
        );
    }

    #[test]
    fn test_false_sync_rejected() {
        // a sync word collision whose frame leads nowhere
        let mut buffer = vec![0x0B, 0x77, 0x00, 0x00, 0x00, 0x40, 0x40];
        buffer.extend(garbage(30));
        buffer.extend(frame(1));
        buffer.extend(frame(2));

        assert_eq!(
            find_alignment_offset(&CodecParser::Ac3, &buffer, 0),
            Some((37, 128))
        );
    }

    #[test]
    fn test_incomplete_frame_waits() {
        let mut buffer = frame(1);
        buffer.extend_from_slice(&frame(2)[..5]);
        assert_eq!(find_aligned_run(&CodecParser::Ac3, &buffer), None);

        assert_eq!(find_aligned_run(&CodecParser::Passthrough, &buffer), None);
        assert_eq!(find_aligned_run(&CodecParser::Ac3, &[]), None);
    }

    #[test]
    fn test_take_run_keeps_partial_frame() {
        let mut align = AlignmentBuffer::new(4096);
        let mut data = garbage(3);
        data.extend(frame(1));
        data.extend(frame(2));
        data.extend_from_slice(&frame(3)[..50]);
        align.push(&data);

        let run = align.take_run(&CodecParser::Ac3, |run| run.to_vec()).unwrap();
        assert_eq!(run.len(), 256);
        assert_eq!(&run[..128], &frame(1)[..]);
        assert_eq!(align.len(), 50);

        // the rest of frame 3 plus the next frame completes it
        let mut rest = frame(3)[50..].to_vec();
        rest.extend(frame(4));
        align.push(&rest);
        let run = align.take_run(&CodecParser::Ac3, |run| run.to_vec()).unwrap();
        assert_eq!(run.len(), 256);
        assert_eq!(&run[..128], &frame(3)[..]);
        assert!(align.is_empty());
    }

    #[test]
    fn test_overrun_discards_and_resyncs() {
        let cap = 256 * 1024;
        let mut align = AlignmentBuffer::new(cap);
        for _ in 0..300 {
            align.push(&garbage(1000));
            assert!(align.len() <= cap);
            assert!(align.take_run(&CodecParser::Ac3, |run| run.len()).is_none());
        }
        // 300 kB went in, so at least one reset happened
        assert!(align.len() < 300 * 1000 - cap);

        let mut frames = frame(1);
        frames.extend(frame(2));
        align.push(&frames);
        assert_eq!(align.take_run(&CodecParser::Ac3, |run| run.len()), Some(256));
    }

    #[test]
    fn test_oversized_payload_dropped() {
        let mut align = AlignmentBuffer::new(100);
        align.push(&garbage(60));
        align.push(&garbage(101));
        assert!(align.is_empty());
    }
}
