// es_format_t 미러 (vlc_es.h)
// 56 bytes 헤더 + 152 bytes union(video/audio/subs) + 32 bytes 꼬리 = 240 bytes

use std::ffi::{c_char, c_void};
use std::mem::{offset_of, size_of};

use super::video_format::VideoFormat;

/// ES 카테고리 (i_cat)
pub const UNKNOWN_ES: i32 = 0;
pub const VIDEO_ES: i32 = 1;
pub const AUDIO_ES: i32 = 2;
pub const SPU_ES: i32 = 3;

/// audio_format_t
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioFormat {
    pub format: u32,
    pub rate: u32,
    pub physical_channels: u16,
    pub chan_mode: u16,
    pub channel_type: i32,
    pub bytes_per_frame: u32,
    pub frame_length: u32,
    pub bits_per_sample: u32,
    pub block_align: u32,
    pub channels: u8,
}

/// subs_format_t 앞부분만: 나머지(spu 팔레트, dvb, teletext ...)는 읽지 않음
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SubsFormatPrefix {
    pub encoding: *const c_char,
    pub x_origin: i32,
    pub y_origin: i32,
}

/// ES 페이로드 union: i_cat에 따라 하나의 해석만 유효
#[repr(C)]
#[derive(Clone, Copy)]
pub union EsPayload {
    pub video: VideoFormat,
    pub audio: AudioFormat,
    pub subs: SubsFormatPrefix,
    pub raw: [u8; size_of::<VideoFormat>()],
}

/// 카테고리별로 해석된 페이로드
#[derive(Debug, Clone, Copy)]
pub enum EsPayloadRef<'a> {
    Video(&'a VideoFormat),
    Audio(&'a AudioFormat),
    Subs(&'a SubsFormatPrefix),
    Other(&'a [u8; size_of::<VideoFormat>()]),
}

/// ES 포맷 (es_format_t)
#[repr(C)]
#[derive(Clone, Copy)]
pub struct EsFormat {
    pub category: i32,
    pub codec: u32,
    pub original_fourcc: u32,
    pub id: i32,
    pub group: i32,
    pub priority: i32,
    pub language: *mut c_char,
    pub description: *mut c_char,
    pub extra_languages_count: u32,
    pub extra_languages: *mut c_void,
    pub payload: EsPayload,
    pub bitrate: u32,
    pub profile: i32,
    pub level: i32,
    pub packetized: u8,
    pub extra_size: usize,
    pub extra: *mut c_void,
}

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(size_of::<EsPayload>() == 152);
    assert!(size_of::<EsFormat>() == 240);
    assert!(offset_of!(EsFormat, payload) == 56);
    assert!(offset_of!(EsFormat, bitrate) == 208);
    assert!(offset_of!(EsFormat, extra) == 232);
};

impl Default for EsFormat {
    fn default() -> Self {
        Self {
            category: UNKNOWN_ES,
            codec: 0,
            original_fourcc: 0,
            id: 0,
            group: 0,
            priority: 0,
            language: std::ptr::null_mut(),
            description: std::ptr::null_mut(),
            extra_languages_count: 0,
            extra_languages: std::ptr::null_mut(),
            payload: EsPayload { raw: [0; size_of::<VideoFormat>()] },
            bitrate: 0,
            profile: 0,
            level: 0,
            packetized: 0,
            extra_size: 0,
            extra: std::ptr::null_mut(),
        }
    }
}

impl std::fmt::Debug for EsFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EsFormat")
            .field("category", &self.category)
            .field("codec", &self.codec)
            .field("payload", &self.payload_ref())
            .field("bitrate", &self.bitrate)
            .finish_non_exhaustive()
    }
}

impl EsFormat {
    /// 비디오 ES로 초기화 (es_format_InitFromVideo 대응)
    pub fn from_video(video: VideoFormat) -> Self {
        Self {
            category: VIDEO_ES,
            codec: video.chroma,
            payload: EsPayload { video },
            ..Self::default()
        }
    }

    pub fn payload_ref(&self) -> EsPayloadRef<'_> {
        // SAFETY: 모든 해석이 plain-old-data이고 union 크기(152) 안에 들어감.
        // 카테고리가 가리키는 해석만 노출
        unsafe {
            match self.category {
                VIDEO_ES => EsPayloadRef::Video(&self.payload.video),
                AUDIO_ES => EsPayloadRef::Audio(&self.payload.audio),
                SPU_ES => EsPayloadRef::Subs(&self.payload.subs),
                _ => EsPayloadRef::Other(&self.payload.raw),
            }
        }
    }

    pub fn video(&self) -> Option<&VideoFormat> {
        match self.payload_ref() {
            EsPayloadRef::Video(v) => Some(v),
            _ => None,
        }
    }

    pub fn audio(&self) -> Option<&AudioFormat> {
        match self.payload_ref() {
            EsPayloadRef::Audio(a) => Some(a),
            _ => None,
        }
    }

    pub fn subs(&self) -> Option<&SubsFormatPrefix> {
        match self.payload_ref() {
            EsPayloadRef::Subs(s) => Some(s),
            _ => None,
        }
    }
}
