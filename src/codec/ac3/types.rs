/// Sync word opening every AC-3 and E-AC-3 frame.
pub const AC3_SYNC_WORD: u16 = 0x0B77;

/// Bytes needed before a frame header can be judged.
pub const AC3_HEADER_SIZE: usize = 7;

/// `acmod` value for 1/0 (mono).
pub const AC3_CHMODE_MONO: u32 = 1;
/// `acmod` value for 2/0 (stereo).
pub const AC3_CHMODE_STEREO: u32 = 2;

/// Highest valid `frmsizecod`.
pub const AC3_MAX_FRMSIZECOD: u32 = 37;

/// Highest `bsid` still decoded as plain AC-3.
pub const AC3_MAX_BSID: u32 = 10;

/// `bsid` range of Enhanced AC-3.
pub const EAC3_BSID_RANGE: std::ops::RangeInclusive<u32> = 10..=16;

/// Sample rates indexed by `fscod`.
pub const AC3_SAMPLE_RATE_TABLE: [u32; 3] = [48000, 44100, 32000];

/// Nominal bit rates in kbit/s indexed by `frmsizecod >> 1`.
pub const AC3_BITRATE_TABLE: [u32; 19] = [
    32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 448, 512, 576, 640,
];

/// Full-bandwidth channels indexed by `acmod`.
pub const AC3_CHANNELS_TABLE: [u32; 8] = [2, 1, 2, 3, 3, 4, 4, 5];

/// Frame sizes in 16-bit words indexed by `[frmsizecod][fscod]`.
pub const AC3_FRAME_SIZE_TABLE: [[u16; 3]; 38] = [
    [64, 69, 96],
    [64, 70, 96],
    [80, 87, 120],
    [80, 88, 120],
    [96, 104, 144],
    [96, 105, 144],
    [112, 121, 168],
    [112, 122, 168],
    [128, 139, 192],
    [128, 140, 192],
    [160, 174, 240],
    [160, 175, 240],
    [192, 208, 288],
    [192, 209, 288],
    [224, 243, 336],
    [224, 244, 336],
    [256, 278, 384],
    [256, 279, 384],
    [320, 348, 480],
    [320, 349, 480],
    [384, 417, 576],
    [384, 418, 576],
    [448, 487, 672],
    [448, 488, 672],
    [512, 557, 768],
    [512, 558, 768],
    [640, 696, 960],
    [640, 697, 960],
    [768, 835, 1152],
    [768, 836, 1152],
    [896, 975, 1344],
    [896, 976, 1344],
    [1024, 1114, 1536],
    [1024, 1115, 1536],
    [1152, 1253, 1728],
    [1152, 1254, 1728],
    [1280, 1393, 1920],
    [1280, 1394, 1920],
];

/// Audio blocks per frame indexed by `numblkscod`.
pub const EAC3_BLOCKS: [u32; 4] = [1, 2, 3, 6];

/// E-AC-3 `strmtyp` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eac3FrameType {
    /// Independent substream, decodable on its own
    Independent,
    /// Extends the preceding independent substream
    Dependent,
    /// Converted from AC-3
    Ac3Convert,
    /// Reserved `strmtyp`
    Reserved,
}

impl From<u32> for Eac3FrameType {
    fn from(value: u32) -> Self {
        match value & 0x03 {
            0 => Eac3FrameType::Independent,
            1 => Eac3FrameType::Dependent,
            2 => Eac3FrameType::Ac3Convert,
            _ => Eac3FrameType::Reserved,
        }
    }
}

/// Returns true if `buf` starts with the AC-3 sync word.
pub fn has_sync_word(buf: &[u8]) -> bool {
    buf.len() >= 2 && u16::from_be_bytes([buf[0], buf[1]]) == AC3_SYNC_WORD
}
