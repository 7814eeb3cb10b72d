// vlc_object_t 미러 (vlc_objects.h): 모든 VLC 객체의 첫 멤버

use std::ffi::c_void;
use std::mem::{offset_of, size_of};

/// VLC 객체 헤더 (24 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ObjectHeader {
    /// struct vlc_logger*
    pub logger: *mut c_void,
    /// vlc_object_internals* / vlc_object_marker* union: 포인터 하나로 취급
    pub priv_or_obj: *mut c_void,
    pub no_interact: u8,
    pub force: u8,
    _reserved: [u8; 6],
}

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(size_of::<ObjectHeader>() == 24);
    assert!(offset_of!(ObjectHeader, no_interact) == 16);
    assert!(offset_of!(ObjectHeader, force) == 17);
};

impl Default for ObjectHeader {
    fn default() -> Self {
        Self {
            logger: std::ptr::null_mut(),
            priv_or_obj: std::ptr::null_mut(),
            no_interact: 0,
            force: 0,
            _reserved: [0; 6],
        }
    }
}
