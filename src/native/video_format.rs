// video_format_t 미러 (vlc_es.h, VLC 4.0.6)
// 크기 152 bytes: 헤더 기준 계산(144)보다 8 bytes 큼. 실제 호스트 메모리 덤프로 확인된 값

use std::ffi::c_void;
use std::mem::{offset_of, size_of};

use crate::rendering::Fourcc;

/// 360° 뷰포인트 (yaw, pitch, roll, fov)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewpoint {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub fov: f32,
}

/// HDR 마스터링 디스플레이 정보
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mastering {
    /// G, B, R 순서의 (x, y)
    pub primaries: [u16; 6],
    pub white_point: [u16; 2],
    pub max_luminance: u32,
    pub min_luminance: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lighting {
    pub max_cll: u16,
    pub max_fall: u16,
}

/// Dolby Vision: C 비트필드는 16비트 하나로 취급
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dovi {
    pub version_major: u8,
    pub version_minor: u8,
    pub flags: u16,
}

/// 비디오 포맷 (video_format_t)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct VideoFormat {
    /// fourcc ('RV32', 'I420' ...)
    pub chroma: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    pub visible_width: u32,
    pub visible_height: u32,
    pub sar_num: u32,
    pub sar_den: u32,
    pub frame_rate: u32,
    pub frame_rate_base: u32,
    _pad_palette: u32,
    pub palette: *mut c_void,
    pub orientation: i32,
    pub primaries: i32,
    pub transfer: i32,
    pub space: i32,
    pub color_range: i32,
    pub chroma_location: i32,
    pub multiview_mode: i32,
    pub multiview_right_eye_first: u8,
    _pad_multiview: [u8; 3],
    pub projection_mode: i32,
    pub pose: Viewpoint,
    pub mastering: Mastering,
    pub lighting: Lighting,
    pub dovi: Dovi,
    pub cubemap_padding: u32,
    _reserved: [u32; 2],
}

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(size_of::<VideoFormat>() == 152);
    assert!(offset_of!(VideoFormat, palette) == 48);
    assert!(offset_of!(VideoFormat, projection_mode) == 88);
};

impl Default for VideoFormat {
    fn default() -> Self {
        Self {
            chroma: 0,
            width: 0,
            height: 0,
            x_offset: 0,
            y_offset: 0,
            visible_width: 0,
            visible_height: 0,
            sar_num: 0,
            sar_den: 0,
            frame_rate: 0,
            frame_rate_base: 0,
            _pad_palette: 0,
            palette: std::ptr::null_mut(),
            orientation: 0,
            primaries: 0,
            transfer: 0,
            space: 0,
            color_range: 0,
            chroma_location: 0,
            multiview_mode: 0,
            multiview_right_eye_first: 0,
            _pad_multiview: [0; 3],
            projection_mode: 0,
            pose: Viewpoint::default(),
            mastering: Mastering::default(),
            lighting: Lighting::default(),
            dovi: Dovi::default(),
            cubemap_padding: 0,
            _reserved: [0; 2],
        }
    }
}

impl VideoFormat {
    /// 지오메트리만 채운 포맷 (visible 영역 = 전체)
    pub fn with_geometry(chroma: Fourcc, width: u32, height: u32) -> Self {
        Self {
            chroma: chroma.0,
            width,
            height,
            visible_width: width,
            visible_height: height,
            sar_num: 1,
            sar_den: 1,
            ..Self::default()
        }
    }

    pub fn fourcc(&self) -> Fourcc {
        Fourcc(self.chroma)
    }
}
