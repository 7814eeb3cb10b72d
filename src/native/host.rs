// libvlccore 심볼: 링크하지 않고 호스트 프로세스에서 런타임에 dlsym으로 찾음
// 테스트 바이너리처럼 VLC가 없는 프로세스에서는 필드 복사 / 해제 생략으로 대체

use std::ffi::{c_void, CStr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;

use super::picture::Picture;

type CopyPropertiesFn = unsafe extern "C" fn(*mut Picture, *const Picture);
type PictureDestroyFn = unsafe extern "C" fn(*mut Picture);

/// 호스트가 export하는 picture 함수들
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCore {
    copy_properties: Option<CopyPropertiesFn>,
    destroy: Option<PictureDestroyFn>,
}

static HOST_CORE: OnceLock<HostCore> = OnceLock::new();
static RELEASE_WARNED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn lookup(name: &CStr) -> *mut c_void {
    // SAFETY: RTLD_DEFAULT 검색은 읽기 전용, name은 NUL 종료 문자열
    unsafe { libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr()) }
}

#[cfg(not(unix))]
fn lookup(_name: &CStr) -> *mut c_void {
    std::ptr::null_mut()
}

impl HostCore {
    /// 프로세스당 1회 심볼 해석
    pub fn get() -> &'static HostCore {
        HOST_CORE.get_or_init(|| {
            let copy = lookup(c"picture_CopyProperties");
            let destroy = lookup(c"picture_Destroy");
            log::debug!(
                "[HOST] picture_CopyProperties={:?} picture_Destroy={:?}",
                copy,
                destroy
            );
            // SAFETY: null이 아니면 vlc_picture.h 시그니처의 함수 주소
            let core = unsafe {
                HostCore {
                    copy_properties: (!copy.is_null())
                        .then(|| std::mem::transmute::<*mut c_void, CopyPropertiesFn>(copy)),
                    destroy: (!destroy.is_null())
                        .then(|| std::mem::transmute::<*mut c_void, PictureDestroyFn>(destroy)),
                }
            };
            if !core.is_attached() {
                log::info!("[HOST] libvlccore picture symbols not resolved, using detached fallbacks");
            }
            core
        })
    }

    /// VLC 없이 동작하는 대체 구현 (테스트용)
    pub fn detached() -> HostCore {
        HostCore::default()
    }

    pub fn is_attached(&self) -> bool {
        self.copy_properties.is_some() && self.destroy.is_some()
    }

    /// # Safety
    /// 두 포인터 모두 호스트(또는 호출자)가 소유한 유효한 picture_t
    pub unsafe fn copy_properties(&self, dst: *mut Picture, src: *const Picture) {
        match self.copy_properties {
            Some(f) => f(dst, src),
            None => (*dst).copy_properties_from(&*src),
        }
    }

    /// picture_Release: refs 감소 후 0이면 picture_Destroy
    /// 심볼이 없으면 해제하지 않음 (누수, 1회 경고)
    ///
    /// # Safety
    /// `pic`은 호출자가 참조 하나를 소유한 유효한 picture_t
    pub unsafe fn release(&self, pic: *mut Picture) {
        let Some(destroy) = self.destroy else {
            if !RELEASE_WARNED.swap(true, Ordering::Relaxed) {
                log::warn!("[HOST] picture_Destroy not found, input pictures are not released");
            }
            return;
        };
        let refs = AtomicUsize::from_ptr(std::ptr::addr_of_mut!((*pic).refs));
        if refs.fetch_sub(1, Ordering::AcqRel) == 1 {
            destroy(pic);
        }
    }
}
