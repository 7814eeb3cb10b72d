// filter_t 미러 (vlc_filter.h)
// 첫 3개 멤버는 decoder_t와 레이아웃 공유. ops(560)는 Open 콜백에서 반드시 기록해야 함

use std::ffi::{c_char, c_int, c_void};
use std::mem::{offset_of, size_of};

use super::es_format::EsFormat;
use super::object::ObjectHeader;
use super::picture::Picture;

/// picture_t* (*filter_video)(filter_t*, picture_t*)
pub type FilterVideoFn = unsafe extern "C" fn(*mut Filter, *mut Picture) -> *mut Picture;
/// picture_t* (*drain_video)(filter_t*)
pub type DrainVideoFn = unsafe extern "C" fn(*mut Filter) -> *mut Picture;
/// void (*flush)(filter_t*) / void (*close)(filter_t*)
pub type FilterVoidFn = unsafe extern "C" fn(*mut Filter);
/// void (*change_viewpoint)(filter_t*, const vlc_viewpoint_t*)
pub type ChangeViewpointFn = unsafe extern "C" fn(*mut Filter, *const c_void);
/// int (*video_mouse)(filter_t*, vlc_mouse_t*, const vlc_mouse_t*)
pub type VideoMouseFn = unsafe extern "C" fn(*mut Filter, *mut c_void, *const c_void) -> c_int;
/// picture_t* (*buffer_new)(filter_t*)
pub type BufferNewFn = unsafe extern "C" fn(*mut Filter) -> *mut Picture;
/// vlc_decoder_device* (*hold_device)(vlc_object_t*, void*)
pub type HoldDeviceFn = unsafe extern "C" fn(*mut c_void, *mut c_void) -> *mut c_void;
/// int (*pf_get_attachments)(filter_t*, input_attachment_t***, int*)
pub type GetAttachmentsFn = unsafe extern "C" fn(*mut Filter, *mut c_void, *mut c_int) -> c_int;

/// 필터 동작 테이블 (struct vlc_filter_operations): 6 슬롯, 순서 고정
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOperations {
    pub filter_video: Option<FilterVideoFn>,
    pub drain_video: Option<DrainVideoFn>,
    pub flush: Option<FilterVoidFn>,
    pub change_viewpoint: Option<ChangeViewpointFn>,
    pub video_mouse: Option<VideoMouseFn>,
    pub close: Option<FilterVoidFn>,
}

/// struct filter_video_callbacks
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterVideoCallbacks {
    pub buffer_new: Option<BufferNewFn>,
    pub hold_device: Option<HoldDeviceFn>,
}

/// filter_owner_t
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FilterOwner {
    /// video/audio/sub 콜백 union을 가리키는 포인터
    pub callbacks: *const c_void,
    pub get_attachments: Option<GetAttachmentsFn>,
    pub sys: *mut c_void,
}

impl Default for FilterOwner {
    fn default() -> Self {
        Self {
            callbacks: std::ptr::null(),
            get_attachments: None,
            sys: std::ptr::null_mut(),
        }
    }
}

impl FilterOwner {
    /// 비디오 필터로 해석한 콜백 테이블
    ///
    /// # Safety
    /// `callbacks`가 null이 아니면 호스트가 채운 유효한 `filter_video_callbacks`를 가리켜야 함
    pub unsafe fn video_callbacks(&self) -> Option<&FilterVideoCallbacks> {
        (self.callbacks as *const FilterVideoCallbacks).as_ref()
    }
}

/// 필터 (filter_t, 592 bytes)
#[repr(C)]
#[derive(Debug)]
pub struct Filter {
    pub obj: ObjectHeader,
    pub module: *mut c_void,
    /// 필터 구현의 개인 상태 (FilterInstance box)
    pub sys: *mut c_void,
    pub fmt_in: EsFormat,
    pub vctx_in: *mut c_void,
    pub fmt_out: EsFormat,
    pub vctx_out: *mut c_void,
    pub allow_fmt_out_change: u8,
    pub name: *const c_char,
    /// config_chain_t*
    pub config: *const c_void,
    pub ops: *const FilterOperations,
    pub owner: FilterOwner,
}

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(size_of::<FilterOperations>() == 48);
    assert!(size_of::<FilterVideoCallbacks>() == 16);
    assert!(size_of::<FilterOwner>() == 24);
    assert!(size_of::<Filter>() == 592);
    assert!(offset_of!(Filter, fmt_in) == 40);
    assert!(offset_of!(Filter, fmt_out) == 288);
    assert!(offset_of!(Filter, ops) == 560);
    assert!(offset_of!(Filter, owner) == 568);
};

impl Default for Filter {
    fn default() -> Self {
        Self {
            obj: ObjectHeader::default(),
            module: std::ptr::null_mut(),
            sys: std::ptr::null_mut(),
            fmt_in: EsFormat::default(),
            vctx_in: std::ptr::null_mut(),
            fmt_out: EsFormat::default(),
            vctx_out: std::ptr::null_mut(),
            allow_fmt_out_change: 0,
            name: std::ptr::null(),
            config: std::ptr::null(),
            ops: std::ptr::null(),
            owner: FilterOwner::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_size() {
        assert_eq!(size_of::<Filter>(), 592);
        assert_eq!(size_of::<FilterOperations>(), 48);
        assert_eq!(size_of::<FilterOwner>(), 24);
        assert_eq!(size_of::<FilterVideoCallbacks>(), 16);
    }

    #[test]
    fn test_filter_offsets() {
        assert_eq!(offset_by_address!(Filter, obj), 0);
        assert_eq!(offset_by_address!(Filter, module), 24);
        assert_eq!(offset_by_address!(Filter, sys), 32);
        assert_eq!(offset_by_address!(Filter, fmt_in), 40);
        assert_eq!(offset_by_address!(Filter, fmt_in.payload.video), 96);
        assert_eq!(offset_by_address!(Filter, fmt_in.payload.video.width), 100);
        assert_eq!(offset_by_address!(Filter, vctx_in), 280);
        assert_eq!(offset_by_address!(Filter, fmt_out), 288);
        assert_eq!(offset_by_address!(Filter, vctx_out), 528);
        assert_eq!(offset_by_address!(Filter, allow_fmt_out_change), 536);
        assert_eq!(offset_by_address!(Filter, name), 544);
        assert_eq!(offset_by_address!(Filter, config), 552);
        assert_eq!(offset_by_address!(Filter, ops), 560);
        assert_eq!(offset_by_address!(Filter, owner), 568);
    }

    #[test]
    fn test_operations_slot_order() {
        assert_eq!(offset_by_address!(FilterOperations, filter_video), 0);
        assert_eq!(offset_by_address!(FilterOperations, drain_video), 8);
        assert_eq!(offset_by_address!(FilterOperations, flush), 16);
        assert_eq!(offset_by_address!(FilterOperations, change_viewpoint), 24);
        assert_eq!(offset_by_address!(FilterOperations, video_mouse), 32);
        assert_eq!(offset_by_address!(FilterOperations, close), 40);
    }

    #[test]
    fn test_owner_offsets() {
        assert_eq!(offset_by_address!(FilterOwner, callbacks), 0);
        assert_eq!(offset_by_address!(FilterOwner, get_attachments), 8);
        assert_eq!(offset_by_address!(FilterOwner, sys), 16);
        assert_eq!(offset_by_address!(FilterVideoCallbacks, buffer_new), 0);
        assert_eq!(offset_by_address!(FilterVideoCallbacks, hold_device), 8);
    }

    #[test]
    fn test_null_callbacks() {
        let owner = FilterOwner::default();
        assert!(unsafe { owner.video_callbacks() }.is_none());
    }
}
