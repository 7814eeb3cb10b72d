// 네이티브 레이아웃 미러: VLC 4.0.6 (64-bit) C 구조체와 바이트 단위로 동일
// 크기/오프셋은 컴파일 타임 assert + 주소 차이 측정 테스트로 고정
// 오프셋이 틀리면 호스트 프로세스 메모리 오염 (복구 불가)

/// 필드 오프셋을 실제 주소 차이로 측정 (테스트 전용)
#[cfg(test)]
macro_rules! offset_by_address {
    ($ty:ty, $($path:tt)+) => {{
        let value = std::mem::MaybeUninit::<$ty>::uninit();
        let base = value.as_ptr();
        // SAFETY: addr_of!는 값을 읽지 않고 주소만 계산
        let field = unsafe { std::ptr::addr_of!((*base).$($path)+) };
        (field as *const u8 as usize) - (base as *const u8 as usize)
    }};
}

pub mod es_format;
pub mod filter;
pub mod host;
pub mod object;
pub mod picture;
pub mod video_format;

pub use es_format::{AudioFormat, EsFormat, EsPayload, EsPayloadRef, SubsFormatPrefix, VIDEO_ES};
pub use filter::{Filter, FilterOperations, FilterOwner, FilterVideoCallbacks};
pub use host::HostCore;
pub use object::ObjectHeader;
pub use picture::{Picture, Plane, PICTURE_PLANE_MAX};
pub use video_format::VideoFormat;
