// rust_overlay: VLC 4.x 비디오 필터 플러그인
// 프레임 위에 진단 오버레이(프레임 번호, 해상도, fourcc)를 합성

pub mod error;
pub mod ffi;
pub mod filter;
pub mod frame;
pub mod native;
pub mod overlay;
pub mod rendering;

pub use error::{FilterError, FilterResult};
pub use filter::{FilterConfig, FilterInstance, FilterState, FrameOutcome};
