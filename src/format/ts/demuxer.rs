use super::parser::{parse_header, payload_offset};
use super::pes_parser::{ParsedPayload, PesParser};
use super::timestamp::Rescaler;
use super::types::*;
use crate::av::{
    AudioInformation, CodecType, StreamContent, StreamDescriptor, StreamPacket, StreamSink,
    VideoInformation,
};
use crate::codec::CodecParser;
use crate::config::DemuxConfig;
use crate::error::{DemuxError, Result};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// DVB subtitling descriptor values of a subtitle stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitlingInfo {
    /// Subtitling type
    pub subtitling_type: u8,
    /// Composition page id
    pub composition_page_id: u16,
    /// Ancillary page id
    pub ancillary_page_id: u16,
}

fn check_packet_size(data: &[u8]) -> Result<()> {
    if data.len() != TS_PACKET_SIZE {
        return Err(DemuxError::InvalidData(format!(
            "TS packet of {} bytes, expected {}",
            data.len(),
            TS_PACKET_SIZE
        )));
    }
    Ok(())
}

/// Demultiplexer state of one elementary stream.
///
/// Owns the stream's parser and the metadata recovered from it. Finished
/// packets and change notifications go to the sink passed into
/// [`process_ts_packet`](Self::process_ts_packet).
#[derive(Debug)]
pub struct StreamDemuxer {
    descriptor: StreamDescriptor,
    parser: Option<PesParser>,
    rescaler: Rescaler,
    audio: AudioInformation,
    video: VideoInformation,
    parsed: bool,
    language: Option<String>,
    audio_type: u8,
    subtitling: Option<SubtitlingInfo>,
}

impl StreamDemuxer {
    /// Sets up the parser matching the descriptor's codec.
    pub fn new(descriptor: StreamDescriptor, config: &DemuxConfig) -> Result<Self> {
        let rescaler = Rescaler::from_pts(config.time_base)?;
        let parser = CodecParser::for_codec(descriptor.codec())
            .map(|codec| PesParser::new(codec, config));
        if parser.is_none() {
            log::error!(
                "Unrecognised stream type {:?} (pid {})",
                descriptor.codec(),
                descriptor.pid()
            );
        }

        Ok(Self {
            descriptor,
            parser,
            rescaler,
            audio: AudioInformation::default(),
            video: VideoInformation::default(),
            parsed: matches!(
                descriptor.content(),
                StreamContent::Teletext | StreamContent::Subtitle
            ),
            language: None,
            audio_type: 0,
            subtitling: None,
        })
    }

    /// The descriptor the stream was registered with.
    pub fn descriptor(&self) -> &StreamDescriptor {
        &self.descriptor
    }

    /// PID of the stream.
    pub fn pid(&self) -> u16 {
        self.descriptor.pid()
    }

    /// Codec of the stream.
    pub fn codec(&self) -> CodecType {
        self.descriptor.codec()
    }

    /// Content class of the stream.
    pub fn content(&self) -> StreamContent {
        self.descriptor.content()
    }

    /// Whether enough is known about the stream to announce it.
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Last audio parameters reported for the stream.
    pub fn audio_information(&self) -> &AudioInformation {
        &self.audio
    }

    /// Last video parameters reported for the stream.
    pub fn video_information(&self) -> &VideoInformation {
        &self.video
    }

    /// ISO 639 language code, if one was set.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Audio type from the language descriptor.
    pub fn audio_type(&self) -> u8 {
        self.audio_type
    }

    /// Subtitling descriptor values, if set.
    pub fn subtitling(&self) -> Option<&SubtitlingInfo> {
        self.subtitling.as_ref()
    }

    /// Bytes held back while searching for frame boundaries.
    pub fn aligned_buffered(&self) -> usize {
        self.parser.as_ref().map_or(0, PesParser::aligned_buffered)
    }

    /// Stores the ISO 639 language code (first three characters) and audio type.
    pub fn set_language(&mut self, language: &str, audio_type: u8) {
        self.language = Some(language.chars().take(3).collect());
        self.audio_type = audio_type;
    }

    /// Stores the subtitling descriptor values and marks the stream parsed.
    pub fn set_subtitling(
        &mut self,
        subtitling_type: u8,
        composition_page_id: u16,
        ancillary_page_id: u16,
    ) {
        self.subtitling = Some(SubtitlingInfo {
            subtitling_type,
            composition_page_id,
            ancillary_page_id,
        });
        self.parsed = true;
    }

    /// Processes one 188 byte transport packet of this stream.
    ///
    /// Packets of another PID and packets flagged with a transport error are
    /// rejected, packets without payload are accepted and ignored.
    pub fn process_ts_packet<S: StreamSink + ?Sized>(&mut self, data: &[u8], sink: &S) -> Result<()> {
        check_packet_size(data)?;
        let header = parse_header(data)?;

        if header.pid != self.pid() {
            return Err(DemuxError::InvalidData(format!(
                "packet of pid {} fed to stream {}",
                header.pid,
                self.pid()
            )));
        }

        if header.transport_error {
            log::error!("transport error (pid {})", header.pid);
            return Err(DemuxError::TransportError { pid: header.pid });
        }

        if !header.contains_payload {
            log::debug!("no payload (pid {})", header.pid);
            return Ok(());
        }

        let offset = payload_offset(data, &header)?;
        let Some(parser) = self.parser.as_mut() else {
            return Ok(());
        };

        if let Some(parsed) = parser.parse(&data[offset..], header.payload_unit_start) {
            if let Some(audio) = parsed.audio {
                self.set_audio_information(audio, sink);
            }
            self.send_packet(parsed, sink);
        }
        Ok(())
    }

    fn send_packet<S: StreamSink + ?Sized>(&self, parsed: ParsedPayload, sink: &S) {
        let (Some(pts), Some(dts)) = (parsed.pts, parsed.dts) else {
            log::debug!("dropping packet without timestamps (pid {})", self.pid());
            return;
        };
        if parsed.data.is_empty() {
            return;
        }

        let mut packet = StreamPacket::new(parsed.data, self.pid(), self.codec())
            .with_pts(self.rescaler.rescale(pts))
            .with_dts(self.rescaler.rescale(dts))
            .with_duration(self.rescaler.rescale(parsed.duration));
        packet.content = self.content();

        sink.send_stream_packet(packet);
    }

    /// Records new audio parameters. Returns `false` if nothing changed.
    pub fn set_audio_information<S: StreamSink + ?Sized>(
        &mut self,
        info: AudioInformation,
        sink: &S,
    ) -> bool {
        if !info.differs_from(&self.audio) {
            return false;
        }

        log::info!(
            "new audio information (pid {}): {} channels, {} Hz",
            self.pid(),
            info.channels,
            info.sample_rate
        );
        if info.bit_rate > 0 {
            log::info!("bitrate: {} bps", info.bit_rate);
        }

        self.audio = info;
        self.parsed = true;

        if sink.is_ready() {
            sink.request_stream_change();
        }
        true
    }

    /// Records new picture parameters. Returns `false` for implausible
    /// pictures and for pictures already announced.
    pub fn set_video_information<S: StreamSink + ?Sized>(
        &mut self,
        info: VideoInformation,
        sink: &S,
    ) -> bool {
        if !info.is_sane() {
            return false;
        }
        if info.same_picture(&self.video) && sink.is_ready() {
            return false;
        }

        log::info!(
            "new picture information (pid {}): {}x{}",
            self.pid(),
            info.width,
            info.height
        );
        if info.pixel_aspect_num != 1 || info.pixel_aspect_den != 1 {
            log::info!(
                "pixel aspect: {}:{}",
                info.pixel_aspect_num,
                info.pixel_aspect_den
            );
        }
        if info.aspect == 0.0 {
            log::info!("unknown display aspect ratio");
        } else {
            log::info!("display aspect ratio: {:.2}", info.aspect);
        }

        self.video = info;
        self.parsed = true;

        if sink.is_ready() {
            sink.request_stream_change();
        }
        true
    }
}

/// Routes transport packets to the elementary streams registered by PID.
///
/// Each stream sits behind its own lock, so packets of different PIDs may be
/// processed from different threads.
pub struct Demultiplexer<S: StreamSink> {
    sink: Arc<S>,
    streams: HashMap<u16, Mutex<StreamDemuxer>>,
    config: DemuxConfig,
}

impl<S: StreamSink> Demultiplexer<S> {
    /// Creates an empty demultiplexer after validating `config`.
    pub fn new(sink: Arc<S>, config: DemuxConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sink,
            streams: HashMap::new(),
            config,
        })
    }

    /// The sink every stream reports to.
    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Configuration shared by all streams.
    pub fn config(&self) -> &DemuxConfig {
        &self.config
    }

    /// Registers a stream. Each PID can carry one stream only.
    pub fn add_stream(&mut self, descriptor: StreamDescriptor) -> Result<()> {
        let pid = descriptor.pid();
        if pid == PID_NULL {
            return Err(DemuxError::InvalidData(
                "null PID cannot carry a stream".into(),
            ));
        }
        if self.streams.contains_key(&pid) {
            return Err(DemuxError::InvalidData(format!(
                "pid {} already registered",
                pid
            )));
        }

        let stream = StreamDemuxer::new(descriptor, &self.config)?;
        self.streams.insert(pid, Mutex::new(stream));
        Ok(())
    }

    /// Unregisters the stream on `pid` and hands it back.
    pub fn remove_stream(&mut self, pid: u16) -> Option<StreamDemuxer> {
        self.streams.remove(&pid).map(|stream| stream.into_inner())
    }

    /// Locks the stream on `pid`.
    pub fn stream(&self, pid: u16) -> Option<MutexGuard<'_, StreamDemuxer>> {
        self.streams.get(&pid).map(|stream| stream.lock())
    }

    /// Registered PIDs in ascending order.
    pub fn pids(&self) -> Vec<u16> {
        let mut pids: Vec<u16> = self.streams.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    /// Hands a transport packet to the stream owning its PID. Packets of
    /// unknown PIDs are ignored.
    pub fn process_ts_packet(&self, data: &[u8]) -> Result<()> {
        check_packet_size(data)?;
        let header = parse_header(data)?;

        match self.streams.get(&header.pid) {
            Some(stream) => stream.lock().process_ts_packet(data, self.sink.as_ref()),
            None => Ok(()),
        }
    }
}
