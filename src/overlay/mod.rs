// 오버레이 소스: 프레임마다 합성할 RGBA 비트맵 공급

pub mod bitmap;
pub mod diagnostic;

pub use bitmap::OverlayBitmap;
pub use diagnostic::DiagnosticOverlay;

use crate::error::FilterResult;

/// 오버레이 비트맵 생성기. 크기는 생성 시 고정
pub trait OverlaySource {
    /// frame_count 기준으로 비트맵을 다시 그림
    fn render(&mut self, frame_count: u64) -> FilterResult<&OverlayBitmap>;

    /// 마지막으로 그린 비트맵
    fn bitmap(&self) -> &OverlayBitmap;
}
