// 비디오 필터 콜백: Open / filter_video / close
// FilterInstance는 Box로 filter_t.p_sys에 보관, ops는 정적 테이블

use std::os::raw::c_int;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use super::types::ErrorCode;
use crate::error::{FilterError, FilterResult};
use crate::filter::{FilterConfig, FilterInstance, FrameOutcome};
use crate::frame::{first_cpu_plane, FormatInfo, PictureLayout, PlaneMut};
use crate::native::{Filter, FilterOperations, HostCore, Picture};

/// 모듈당 하나: slot 0 (filter_video), slot 5 (close)만 사용
pub static FILTER_OPERATIONS: FilterOperations = FilterOperations {
    filter_video: Some(filter_video),
    drain_video: None,
    flush: None,
    change_viewpoint: None,
    video_mouse: None,
    close: Some(close_filter),
};

/// Open 콜백
///
/// # Safety
/// `filter`는 호스트가 할당한 유효한 filter_t
pub unsafe extern "C" fn open_filter(filter: *mut Filter) -> c_int {
    super::init_logging();

    let Some(filter) = filter.as_mut() else {
        log::error!("[FILTER] open: null filter");
        return ErrorCode::Generic.into();
    };

    match panic::catch_unwind(AssertUnwindSafe(|| open_with(filter, FilterConfig::from_env()))) {
        Ok(Ok(())) => ErrorCode::Success.into(),
        Ok(Err(e)) => {
            log::error!("[FILTER] open failed: {}", e);
            ErrorCode::Generic.into()
        }
        Err(_) => {
            log::error!("[FILTER] open panicked");
            ErrorCode::Generic.into()
        }
    }
}

/// 인스턴스 생성 + 활성화 후 filter_t에 설치
pub fn open_with(filter: &mut Filter, config: FilterConfig) -> FilterResult<()> {
    if !filter.sys.is_null() {
        return Err(FilterError::activation("filter already has private state"));
    }
    let video = filter.fmt_in.video().ok_or_else(|| {
        FilterError::activation(format!("input ES category {} is not video", filter.fmt_in.category))
    })?;
    let format = FormatInfo::from(video);

    let mut instance = Box::new(FilterInstance::new(config));
    instance.activate(format)?;

    filter.sys = Box::into_raw(instance).cast();
    filter.ops = &FILTER_OPERATIONS;
    Ok(())
}

/// slot 0: 프레임 한 장 처리. 어떤 경우에도 패닉을 호스트로 넘기지 않음
///
/// # Safety
/// 호스트가 넘긴 filter_t / picture_t (picture는 null 가능)
pub unsafe extern "C" fn filter_video(filter: *mut Filter, pic: *mut Picture) -> *mut Picture {
    if pic.is_null() {
        return ptr::null_mut();
    }
    if filter.is_null() {
        return pic;
    }

    match panic::catch_unwind(AssertUnwindSafe(|| process_picture(filter, pic, HostCore::get()))) {
        Ok(out) => out,
        Err(_) => {
            log::error!("[FILTER] filter_video panicked, passing frame through");
            pic
        }
    }
}

/// 반환값: 호스트에 돌려줄 picture (입력 또는 새 출력 버퍼)
///
/// # Safety
/// `filter`, `pic`은 null이 아닌 유효한 포인터
pub(crate) unsafe fn process_picture(
    filter: *mut Filter,
    pic: *mut Picture,
    host: &HostCore,
) -> *mut Picture {
    let Some(instance) = ((*filter).sys as *mut FilterInstance).as_mut() else {
        return pic;
    };

    let layout = PictureLayout::from_picture(&*pic);
    if !layout.is_opaque() && first_cpu_plane(&*pic).is_some() {
        composite_picture(instance, &mut *pic);
        return pic;
    }

    // GPU 상주 프레임: owner에게 CPU 출력 버퍼 요청
    let Some(buffer_new) = (*filter).owner.video_callbacks().and_then(|cb| cb.buffer_new) else {
        log::trace!("[FILTER] opaque picture without buffer_new, passing through");
        return pic;
    };
    let out = buffer_new(filter);
    if out.is_null() {
        return pic;
    }
    if first_cpu_plane(&*out).is_none() {
        host.release(out);
        return pic;
    }

    // 합성되지 않은 출력 버퍼는 원본을 덮어쓰지 않도록 버리고 입력을 그대로 반환
    match composite_picture(instance, &mut *out) {
        FrameOutcome::Composited { .. } => {
            host.copy_properties(out, pic);
            host.release(pic);
            out
        }
        outcome => {
            log::trace!("[FILTER] opaque frame not composited ({:?}), keeping input", outcome);
            host.release(out);
            pic
        }
    }
}

unsafe fn composite_picture(instance: &mut FilterInstance, pic: &mut Picture) -> FrameOutcome {
    let chroma = pic.format.fourcc();
    let Some(plane) = first_cpu_plane(pic) else {
        return FrameOutcome::PassThrough;
    };
    match PlaneMut::from_plane(plane) {
        Ok(mut view) => instance.process_frame(&mut view, chroma),
        Err(e) => instance.reject_frame(&e.to_string()),
    }
}

/// slot 5: 인스턴스 해제, p_sys null로
///
/// # Safety
/// `filter`는 open_filter가 성공한 filter_t
pub unsafe extern "C" fn close_filter(filter: *mut Filter) {
    let Some(filter) = filter.as_mut() else {
        return;
    };
    let sys = std::mem::replace(&mut filter.sys, ptr::null_mut());
    if sys.is_null() {
        return;
    }
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut instance = Box::from_raw(sys as *mut FilterInstance);
        instance.close();
    }));
    if result.is_err() {
        log::error!("[FILTER] close panicked");
    }
}
