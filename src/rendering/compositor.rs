// 오버레이 합성: straight-alpha RGBA 비트맵을 호스트 평면 위에 in-place 블렌딩
// 패킹 RGB: 채널 순서 반영, planar YUV: 첫 평면(luma)에 회색조로 기록

use super::pixel_format::{classify, Fourcc, PixelFormatInfo};
use crate::frame::PlaneMut;
use crate::overlay::OverlayBitmap;

/// 프레임 좌상단 기준 오버레이 위치 (픽셀)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inset {
    pub x: usize,
    pub y: usize,
}

impl Default for Inset {
    fn default() -> Self {
        Self { x: 10, y: 10 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// bytes_per_pixel == 0
    UnknownFormat,
    /// inset 이후 남는 영역 없음
    Clipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOutcome {
    /// 실제로 쓴 영역 크기
    Composited { width: usize, height: usize },
    Skipped(SkipReason),
}

impl CompositeOutcome {
    pub fn is_composited(&self) -> bool {
        matches!(self, CompositeOutcome::Composited { .. })
    }
}

/// 평면 위에 오버레이를 합성
pub fn composite(
    plane: &mut PlaneMut<'_>,
    chroma: Fourcc,
    overlay: &OverlayBitmap,
    inset: Inset,
) -> CompositeOutcome {
    let info = classify(chroma);
    if !info.is_processable() {
        return CompositeOutcome::Skipped(SkipReason::UnknownFormat);
    }
    let bpp = info.bytes_per_pixel as usize;

    let frame_width = plane.visible_pitch() / bpp;
    let frame_height = plane.visible_lines();
    let width = (overlay.width() as usize).min(frame_width.saturating_sub(inset.x));
    let height = (overlay.height() as usize).min(frame_height.saturating_sub(inset.y));
    if width == 0 || height == 0 {
        return CompositeOutcome::Skipped(SkipReason::Clipped);
    }

    let src_stride = overlay.width() as usize * 4;
    let src = overlay.as_rgba();
    let x_start = inset.x * bpp;
    let x_end = x_start + width * bpp;

    for oy in 0..height {
        let Some(row) = plane.row_mut(inset.y + oy) else {
            break;
        };
        let src_row = &src[oy * src_stride..oy * src_stride + width * 4];
        let dst_row = &mut row[x_start..x_end];

        for (s, d) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(bpp)) {
            blend_pixel(d, [s[0], s[1], s[2]], s[3], &info);
        }
    }

    CompositeOutcome::Composited { width, height }
}

/// 한 픽셀 블렌딩. dst 길이 = bytes_per_pixel
fn blend_pixel(dst: &mut [u8], rgb: [u8; 3], alpha: u8, info: &PixelFormatInfo) {
    if alpha == 0 {
        return; // 완전 투명: 스킵
    }

    if dst.len() == 1 {
        let [r, g, b] = rgb.map(u32::from);
        let gray = ((r * 77 + g * 150 + b * 29) >> 8) as u8;
        dst[0] = mix(gray, dst[0], alpha);
        return;
    }

    let ordered = if info.is_bgr { [rgb[2], rgb[1], rgb[0]] } else { rgb };
    if alpha == 255 {
        // 완전 불투명: 직접 복사
        dst[..3].copy_from_slice(&ordered);
        if info.has_alpha {
            if let Some(a) = dst.get_mut(3) {
                *a = 255;
            }
        }
    } else {
        for (d, s) in dst[..3].iter_mut().zip(ordered) {
            *d = mix(s, *d, alpha);
        }
    }
}

/// out = src * a + dst * (1 - a), 정수 절삭
#[inline]
fn mix(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + dst as u32 * (255 - a)) / 255) as u8
}
