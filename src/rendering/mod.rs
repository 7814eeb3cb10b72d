// 렌더링 모듈: 픽셀 포맷 분류 + 오버레이 합성

pub mod compositor;
pub mod pixel_format;

pub use compositor::{composite, CompositeOutcome, Inset, SkipReason};
pub use pixel_format::{classify, Fourcc, PixelFormatInfo};
