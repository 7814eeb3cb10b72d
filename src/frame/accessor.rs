// picture_t → 평면 기술자 해석

use crate::error::{FilterError, FilterResult};
use crate::native::{Picture, Plane, VideoFormat, PICTURE_PLANE_MAX};
use crate::rendering::Fourcc;

/// 포맷 정보 (chroma + 지오메트리)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub chroma: Fourcc,
    pub width: u32,
    pub height: u32,
    pub visible_width: u32,
    pub visible_height: u32,
}

impl From<&VideoFormat> for FormatInfo {
    fn from(fmt: &VideoFormat) -> Self {
        Self {
            chroma: fmt.fourcc(),
            width: fmt.width,
            height: fmt.height,
            visible_width: fmt.visible_width,
            visible_height: fmt.visible_height,
        }
    }
}

/// 평면 기술자 (plane_t 값 복사)
#[derive(Debug, Clone, Copy)]
pub struct PlaneInfo {
    pub pixels: *mut u8,
    pub pixel_pitch: i32,
    pub pitch: i32,
    pub lines: i32,
    pub visible_pitch: i32,
    pub visible_lines: i32,
}

impl From<&Plane> for PlaneInfo {
    fn from(p: &Plane) -> Self {
        Self {
            pixels: p.pixels,
            pixel_pitch: p.pixel_pitch,
            pitch: p.pitch,
            lines: p.lines,
            visible_pitch: p.visible_pitch,
            visible_lines: p.visible_lines,
        }
    }
}

/// 픽처 레이아웃: 최대 5개 평면
#[derive(Debug, Clone)]
pub struct PictureLayout {
    pub format: FormatInfo,
    pub planes: Vec<PlaneInfo>,
}

impl PictureLayout {
    pub fn from_picture(pic: &Picture) -> Self {
        let count = pic.plane_count.clamp(0, PICTURE_PLANE_MAX as i32) as usize;
        Self {
            format: FormatInfo::from(&pic.format),
            planes: pic.planes[..count].iter().map(PlaneInfo::from).collect(),
        }
    }

    /// 평면 0개 = GPU 상주 (CPU 접근 금지)
    pub fn is_opaque(&self) -> bool {
        self.planes.is_empty()
    }
}

/// index번째 평면 (0 <= index < 5)
pub fn plane_at(pic: &Picture, index: usize) -> FilterResult<&Plane> {
    pic.planes.get(index).ok_or_else(|| {
        FilterError::invalid(format!("plane index {} out of range 0..{}", index, PICTURE_PLANE_MAX))
    })
}

/// 픽셀 접근 가능한 첫 평면: opaque이거나 포인터가 null이면 None
pub fn first_cpu_plane(pic: &Picture) -> Option<&Plane> {
    if pic.plane_count <= 0 {
        return None;
    }
    let plane = &pic.planes[0];
    (!plane.pixels.is_null()).then_some(plane)
}
