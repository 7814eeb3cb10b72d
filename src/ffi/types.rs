// 호스트와 공유하는 상수: 반환 코드 + 모듈 등록 프로퍼티

use std::os::raw::c_int;

/// 에러 코드 (vlc_common.h)
pub const VLC_SUCCESS: c_int = 0;
pub const VLC_EGENERIC: c_int = -1;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = VLC_SUCCESS,
    Generic = VLC_EGENERIC,
}

impl From<ErrorCode> for c_int {
    fn from(code: ErrorCode) -> Self {
        code as c_int
    }
}

/// vlc_set 프로퍼티 (vlc_plugin.h)
pub const VLC_MODULE_CREATE: c_int = 0;
pub const VLC_MODULE_CAPABILITY: c_int = 0x102;
pub const VLC_MODULE_SCORE: c_int = 0x103;
pub const VLC_MODULE_CB_OPEN: c_int = 0x104;
pub const VLC_MODULE_NAME: c_int = 0x107;
pub const VLC_MODULE_SHORTNAME: c_int = 0x108;
pub const VLC_MODULE_DESCRIPTION: c_int = 0x109;

/// 빌드 대상 libvlccore API 버전
pub const VLC_API_VERSION: &str = "4.0.6";
pub const COPYRIGHT: &str = "Copyright (C) VideoLabs";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(c_int::from(ErrorCode::Success), 0);
        assert_eq!(c_int::from(ErrorCode::Generic), -1);
    }
}
