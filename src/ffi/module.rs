// 모듈 등록: vlc_entry / vlc_entry_api_version / vlc_entry_copyright
// vlc_set은 variadic이라 ModuleSink 뒤에 숨기고, 테스트는 기록용 sink를 사용

use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use super::filter::open_filter;
use super::pinned::pin;
use super::types::*;
use crate::error::{FilterError, FilterResult};

/// int vlc_set(void *opaque, void *module, int property, ...)
pub type VlcSetFn = unsafe extern "C" fn(*mut c_void, *mut c_void, c_int, ...) -> c_int;

pub const MODULE_NAME: &str = "rust_overlay";
pub const MODULE_SHORTNAME: &str = "Rust Overlay";
pub const MODULE_DESCRIPTION: &str = "Rust diagnostic video filter overlay";
pub const MODULE_CAPABILITY: &str = "video filter";
pub const OPEN_CALLBACK_NAME: &str = "Open";

/// vlc_set 호출 대상
pub trait ModuleSink {
    /// VLC_MODULE_CREATE: 새 모듈 핸들
    fn create(&mut self) -> Result<*mut c_void, c_int>;
    fn set_string(&mut self, module: *mut c_void, property: c_int, value: &'static CStr) -> c_int;
    fn set_int(&mut self, module: *mut c_void, property: c_int, value: c_int) -> c_int;
    fn set_callback(
        &mut self,
        module: *mut c_void,
        property: c_int,
        name: &'static CStr,
        callback: *const c_void,
    ) -> c_int;
}

/// 호스트의 vlc_set을 그대로 호출
pub struct VlcSetSink {
    vlc_set: VlcSetFn,
    opaque: *mut c_void,
}

impl VlcSetSink {
    pub fn new(vlc_set: VlcSetFn, opaque: *mut c_void) -> Self {
        Self { vlc_set, opaque }
    }
}

impl ModuleSink for VlcSetSink {
    fn create(&mut self) -> Result<*mut c_void, c_int> {
        let mut module: *mut c_void = ptr::null_mut();
        // SAFETY: vlc_entry 동안 호스트가 준 콜백, CREATE는 void** 하나를 받음
        let code = unsafe {
            (self.vlc_set)(
                self.opaque,
                ptr::null_mut(),
                VLC_MODULE_CREATE,
                &mut module as *mut *mut c_void,
            )
        };
        if code != VLC_SUCCESS {
            return Err(code);
        }
        Ok(module)
    }

    fn set_string(&mut self, module: *mut c_void, property: c_int, value: &'static CStr) -> c_int {
        // SAFETY: 문자열 프로퍼티는 const char* 하나, 값은 프로세스 수명
        unsafe { (self.vlc_set)(self.opaque, module, property, value.as_ptr()) }
    }

    fn set_int(&mut self, module: *mut c_void, property: c_int, value: c_int) -> c_int {
        // SAFETY: 정수 프로퍼티는 int 하나
        unsafe { (self.vlc_set)(self.opaque, module, property, value) }
    }

    fn set_callback(
        &mut self,
        module: *mut c_void,
        property: c_int,
        name: &'static CStr,
        callback: *const c_void,
    ) -> c_int {
        // SAFETY: 콜백 프로퍼티는 (const char* name, void* fn)
        unsafe { (self.vlc_set)(self.opaque, module, property, name.as_ptr(), callback) }
    }
}

/// 모듈 디스크립터 빌더: 모든 문자열은 pin()으로 고정
pub struct ModuleBuilder<'s, S: ModuleSink> {
    sink: &'s mut S,
    module: *mut c_void,
}

impl<'s, S: ModuleSink> ModuleBuilder<'s, S> {
    pub fn create(sink: &'s mut S) -> FilterResult<Self> {
        let module = sink
            .create()
            .map_err(|code| FilterError::Registration { property: VLC_MODULE_CREATE, code })?;
        Ok(Self { sink, module })
    }

    fn check(self, property: c_int, code: c_int) -> FilterResult<Self> {
        if code != VLC_SUCCESS {
            return Err(FilterError::Registration { property, code });
        }
        Ok(self)
    }

    fn string(self, property: c_int, value: &str) -> FilterResult<Self> {
        let value = pin(value)?;
        let code = self.sink.set_string(self.module, property, value);
        self.check(property, code)
    }

    pub fn name(self, name: &str) -> FilterResult<Self> {
        self.string(VLC_MODULE_NAME, name)
    }

    pub fn shortname(self, name: &str) -> FilterResult<Self> {
        self.string(VLC_MODULE_SHORTNAME, name)
    }

    pub fn description(self, text: &str) -> FilterResult<Self> {
        self.string(VLC_MODULE_DESCRIPTION, text)
    }

    pub fn capability(self, capability: &str) -> FilterResult<Self> {
        self.string(VLC_MODULE_CAPABILITY, capability)
    }

    pub fn score(self, score: c_int) -> FilterResult<Self> {
        let code = self.sink.set_int(self.module, VLC_MODULE_SCORE, score);
        self.check(VLC_MODULE_SCORE, code)
    }

    pub fn open_callback(self, name: &str, callback: *const c_void) -> FilterResult<Self> {
        let name = pin(name)?;
        let code = self.sink.set_callback(self.module, VLC_MODULE_CB_OPEN, name, callback);
        self.check(VLC_MODULE_CB_OPEN, code)
    }
}

/// 비디오 필터 모듈 하나를 등록
pub fn describe_module<S: ModuleSink>(sink: &mut S) -> FilterResult<()> {
    ModuleBuilder::create(sink)?
        .name(MODULE_NAME)?
        .shortname(MODULE_SHORTNAME)?
        .description(MODULE_DESCRIPTION)?
        .capability(MODULE_CAPABILITY)?
        .score(0)?
        .open_callback(OPEN_CALLBACK_NAME, open_filter as *const c_void)?;
    Ok(())
}

/// 플러그인 진입점
///
/// # Safety
/// 호스트가 유효한 vlc_set 콜백과 opaque를 전달해야 함
#[no_mangle]
pub unsafe extern "C" fn vlc_entry(vlc_set: Option<VlcSetFn>, opaque: *mut c_void) -> c_int {
    super::init_logging();

    let Some(vlc_set) = vlc_set else {
        log::error!("[MODULE] vlc_entry: null vlc_set");
        return ErrorCode::Generic.into();
    };

    let mut sink = VlcSetSink::new(vlc_set, opaque);
    match panic::catch_unwind(AssertUnwindSafe(|| describe_module(&mut sink))) {
        Ok(Ok(())) => {
            log::info!("[MODULE] registered {} ({})", MODULE_NAME, MODULE_CAPABILITY);
            ErrorCode::Success.into()
        }
        Ok(Err(e)) => {
            log::error!("[MODULE] registration failed: {}", e);
            ErrorCode::Generic.into()
        }
        Err(_) => {
            log::error!("[MODULE] registration panicked");
            ErrorCode::Generic.into()
        }
    }
}

#[no_mangle]
pub extern "C" fn vlc_entry_api_version() -> *const c_char {
    pin(VLC_API_VERSION).map_or(ptr::null(), CStr::as_ptr)
}

#[no_mangle]
pub extern "C" fn vlc_entry_copyright() -> *const c_char {
    pin(COPYRIGHT).map_or(ptr::null(), CStr::as_ptr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create,
        Str(c_int, String),
        Int(c_int, c_int),
        Callback(c_int, String, *const c_void),
    }

    /// vlc_set 호출 순서를 기록
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Call>,
        fail_on: Option<c_int>,
    }

    const FAKE_MODULE: usize = 0x1000;

    impl RecordingSink {
        fn code(&self, property: c_int) -> c_int {
            if self.fail_on == Some(property) { VLC_EGENERIC } else { VLC_SUCCESS }
        }
    }

    impl ModuleSink for RecordingSink {
        fn create(&mut self) -> Result<*mut c_void, c_int> {
            self.calls.push(Call::Create);
            match self.code(VLC_MODULE_CREATE) {
                VLC_SUCCESS => Ok(FAKE_MODULE as *mut c_void),
                code => Err(code),
            }
        }

        fn set_string(&mut self, module: *mut c_void, property: c_int, value: &'static CStr) -> c_int {
            assert_eq!(module as usize, FAKE_MODULE);
            self.calls.push(Call::Str(property, value.to_string_lossy().into_owned()));
            self.code(property)
        }

        fn set_int(&mut self, module: *mut c_void, property: c_int, value: c_int) -> c_int {
            assert_eq!(module as usize, FAKE_MODULE);
            self.calls.push(Call::Int(property, value));
            self.code(property)
        }

        fn set_callback(
            &mut self,
            module: *mut c_void,
            property: c_int,
            name: &'static CStr,
            callback: *const c_void,
        ) -> c_int {
            assert_eq!(module as usize, FAKE_MODULE);
            self.calls
                .push(Call::Callback(property, name.to_string_lossy().into_owned(), callback));
            self.code(property)
        }
    }

    #[test]
    fn test_registration_order() {
        let mut sink = RecordingSink::default();
        describe_module(&mut sink).unwrap();
        assert_eq!(
            sink.calls,
            vec![
                Call::Create,
                Call::Str(VLC_MODULE_NAME, "rust_overlay".into()),
                Call::Str(VLC_MODULE_SHORTNAME, MODULE_SHORTNAME.into()),
                Call::Str(VLC_MODULE_DESCRIPTION, MODULE_DESCRIPTION.into()),
                Call::Str(VLC_MODULE_CAPABILITY, "video filter".into()),
                Call::Int(VLC_MODULE_SCORE, 0),
                Call::Callback(VLC_MODULE_CB_OPEN, "Open".into(), open_filter as *const c_void),
            ]
        );
    }

    #[test]
    fn test_registration_stops_on_failure() {
        let mut sink = RecordingSink { fail_on: Some(VLC_MODULE_CAPABILITY), ..Default::default() };
        let err = describe_module(&mut sink).unwrap_err();
        assert!(matches!(
            err,
            FilterError::Registration { property: VLC_MODULE_CAPABILITY, code: VLC_EGENERIC }
        ));
        assert_eq!(sink.calls.len(), 5);

        let mut sink = RecordingSink { fail_on: Some(VLC_MODULE_CREATE), ..Default::default() };
        assert!(describe_module(&mut sink).is_err());
        assert_eq!(sink.calls, vec![Call::Create]);
    }

    #[test]
    fn test_entry_strings_are_pinned() {
        let version = vlc_entry_api_version();
        assert_eq!(version, vlc_entry_api_version());
        let version = unsafe { CStr::from_ptr(version) };
        assert_eq!(version.to_str().unwrap(), "4.0.6");

        let copyright = unsafe { CStr::from_ptr(vlc_entry_copyright()) };
        assert_eq!(copyright.to_str().unwrap(), COPYRIGHT);
    }

    #[test]
    fn test_vlc_entry_null_callback() {
        assert_eq!(unsafe { vlc_entry(None, ptr::null_mut()) }, VLC_EGENERIC);
    }
}
