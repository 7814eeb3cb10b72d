// picture_t / plane_t 미러 (vlc_picture.h)

use std::ffi::c_void;
use std::mem::{offset_of, size_of};

use super::video_format::VideoFormat;

/// PICTURE_PLANE_MAX (= VOUT_MAX_PLANES)
pub const PICTURE_PLANE_MAX: usize = 5;

/// 평면 하나 (plane_t, 32 bytes: 끝 4 bytes는 암묵적 패딩)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub pixels: *mut u8,
    /// 마진 포함 라인 수
    pub lines: i32,
    /// 마진 포함 한 줄 바이트 수 (stride)
    pub pitch: i32,
    /// 매크로픽셀 크기 (기본 1)
    pub pixel_pitch: i32,
    pub visible_lines: i32,
    pub visible_pitch: i32,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            pixels: std::ptr::null_mut(),
            lines: 0,
            pitch: 0,
            pixel_pitch: 0,
            visible_lines: 0,
            visible_pitch: 0,
        }
    }
}

/// 비디오 픽처 (picture_t)
#[repr(C)]
#[derive(Debug)]
pub struct Picture {
    pub format: VideoFormat,
    pub planes: [Plane; PICTURE_PLANE_MAX],
    pub plane_count: i32,
    /// vlc_tick_t
    pub date: i64,
    pub force: u8,
    pub still: u8,
    pub progressive: u8,
    pub top_field_first: u8,
    pub multiview_left_eye: u8,
    pub nb_fields: u32,
    pub context: *mut c_void,
    pub sys: *mut c_void,
    pub next: *mut Picture,
    /// vlc_atomic_rc_t (atomic_uintptr_t)
    pub refs: usize,
}

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(size_of::<Plane>() == 32);
    assert!(size_of::<Picture>() >= 368);
    assert!(offset_of!(Picture, planes) == 152);
    assert!(offset_of!(Picture, plane_count) == 312);
    assert!(offset_of!(Picture, refs) == 368);
};

impl Default for Picture {
    fn default() -> Self {
        Self {
            format: VideoFormat::default(),
            planes: [Plane::default(); PICTURE_PLANE_MAX],
            plane_count: 0,
            date: 0,
            force: 0,
            still: 0,
            progressive: 0,
            top_field_first: 0,
            multiview_left_eye: 0,
            nb_fields: 0,
            context: std::ptr::null_mut(),
            sys: std::ptr::null_mut(),
            next: std::ptr::null_mut(),
            refs: 1,
        }
    }
}

impl Picture {
    /// 프레임 메타데이터 복사 (picture_CopyProperties의 필드 단위 대체)
    /// context는 참조 카운트가 필요하므로 복사하지 않음
    pub fn copy_properties_from(&mut self, src: &Picture) {
        self.date = src.date;
        self.force = src.force;
        self.still = src.still;
        self.progressive = src.progressive;
        self.top_field_first = src.top_field_first;
        self.multiview_left_eye = src.multiview_left_eye;
        self.nb_fields = src.nb_fields;
    }
}
