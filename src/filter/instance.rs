// 필터 인스턴스: Uninitialized → Active → Closed 상태 머신
// 프레임 처리 중 오류/패닉은 pass-through로 흡수 (호스트로 전파하지 않음)

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::FilterConfig;
use crate::error::{FilterError, FilterResult};
use crate::frame::{FormatInfo, PlaneMut};
use crate::overlay::{DiagnosticOverlay, OverlaySource};
use crate::rendering::{composite, CompositeOutcome, Fourcc, SkipReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Uninitialized,
    Active,
    /// 종료 상태: 재활성화 불가
    Closed,
}

/// 프레임 한 장의 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Composited { width: usize, height: usize },
    Skipped(SkipReason),
    /// 처리 오류: 프레임은 그대로 통과
    PassThrough,
    /// Active 상태가 아님: 버퍼 접근 안 함
    Inactive,
}

pub struct FilterInstance {
    state: FilterState,
    config: FilterConfig,
    source: Option<Box<dyn OverlaySource>>,
    geometry: Option<FormatInfo>,
    frame_count: u64,
    dump_pending: bool,
    unknown_format_logged: bool,
    fault_count: u64,
}

impl FilterInstance {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            state: FilterState::Uninitialized,
            config,
            source: None,
            geometry: None,
            frame_count: 0,
            dump_pending: false,
            unknown_format_logged: false,
            fault_count: 0,
        }
    }

    /// 기본 진단 오버레이로 활성화
    pub fn activate(&mut self, format: FormatInfo) -> FilterResult<()> {
        self.ensure_uninitialized()?;
        let detail = format!(
            "{}x{} {} (0x{:08x})",
            format.width, format.height, format.chroma, format.chroma.0
        );
        let source = DiagnosticOverlay::new(&self.config, detail)
            .map_err(|e| FilterError::activation(format!("overlay source: {}", e)))?;
        self.activate_with(format, Box::new(source))
    }

    /// 외부 오버레이 소스로 활성화
    pub fn activate_with(
        &mut self,
        format: FormatInfo,
        source: Box<dyn OverlaySource>,
    ) -> FilterResult<()> {
        self.ensure_uninitialized()?;

        self.source = Some(source);
        self.geometry = Some(format);
        self.frame_count = 0;
        self.dump_pending = self.config.dump_path.is_some();
        self.unknown_format_logged = false;
        self.fault_count = 0;
        self.state = FilterState::Active;

        log::info!(
            "[FILTER] activated: {}x{} (visible {}x{}) chroma={} (0x{:08x})",
            format.width,
            format.height,
            format.visible_width,
            format.visible_height,
            format.chroma,
            format.chroma.0
        );
        Ok(())
    }

    fn ensure_uninitialized(&self) -> FilterResult<()> {
        match self.state {
            FilterState::Uninitialized => Ok(()),
            FilterState::Active => Err(FilterError::activation("already active")),
            FilterState::Closed => Err(FilterError::activation("instance is closed")),
        }
    }

    /// 평면 위에 오버레이 합성 (in-place)
    pub fn process_frame(&mut self, plane: &mut PlaneMut<'_>, chroma: Fourcc) -> FrameOutcome {
        if self.state != FilterState::Active {
            return FrameOutcome::Inactive;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.try_process(plane, chroma)));
        match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                self.record_fault(&e.to_string());
                FrameOutcome::PassThrough
            }
            Err(payload) => {
                self.record_fault(&panic_message(payload.as_ref()));
                FrameOutcome::PassThrough
            }
        }
    }

    fn try_process(&mut self, plane: &mut PlaneMut<'_>, chroma: Fourcc) -> FilterResult<FrameOutcome> {
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| FilterError::Render("no overlay source".into()))?;

        self.frame_count += 1;
        let bitmap = source.render(self.frame_count)?;

        match composite(plane, chroma, bitmap, self.config.inset) {
            CompositeOutcome::Composited { width, height } => {
                if self.dump_pending {
                    self.dump_pending = false;
                    self.dump_overlay();
                }
                Ok(FrameOutcome::Composited { width, height })
            }
            CompositeOutcome::Skipped(SkipReason::UnknownFormat) => {
                if !self.unknown_format_logged {
                    self.unknown_format_logged = true;
                    log::warn!(
                        "[FILTER] unknown pixel format {} (0x{:08x}), frames pass through",
                        chroma,
                        chroma.0
                    );
                }
                Ok(FrameOutcome::Skipped(SkipReason::UnknownFormat))
            }
            CompositeOutcome::Skipped(reason) => Ok(FrameOutcome::Skipped(reason)),
        }
    }

    /// 실패해도 재시도하지 않음
    fn dump_overlay(&self) {
        let (Some(path), Some(source)) = (self.config.dump_path.as_deref(), self.source.as_ref()) else {
            return;
        };
        match source.bitmap().save_png(path) {
            Ok(()) => log::info!("[FILTER] overlay dumped to {}", path.display()),
            Err(e) => log::warn!("[FILTER] overlay dump failed: {}", e),
        }
    }

    /// 버퍼에 접근하기 전에 거부된 프레임: 카운트는 하고 그대로 통과
    pub(crate) fn reject_frame(&mut self, message: &str) -> FrameOutcome {
        if self.state != FilterState::Active {
            return FrameOutcome::Inactive;
        }
        self.frame_count += 1;
        self.record_fault(message);
        FrameOutcome::PassThrough
    }

    fn record_fault(&mut self, message: &str) {
        self.fault_count += 1;
        let interval = self.config.fault_log_interval.max(1);
        if self.fault_count == 1 || self.fault_count % interval == 0 {
            log::warn!(
                "[FILTER] frame {} passed through ({} faults): {}",
                self.frame_count,
                self.fault_count,
                message
            );
        }
    }

    /// 소스 해제. 여러 번 호출해도 안전
    /// Active일 때만 Closed로 전이, 활성화 전이면 상태 유지
    pub fn close(&mut self) {
        if self.state == FilterState::Active {
            log::info!("[FILTER] closed after {} frames", self.frame_count);
            self.state = FilterState::Closed;
        }
        self.source = None;
        self.geometry = None;
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn geometry(&self) -> Option<FormatInfo> {
        self.geometry
    }

    pub fn fault_count(&self) -> u64 {
        self.fault_count
    }
}

impl Drop for FilterInstance {
    fn drop(&mut self) {
        self.close();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayBitmap;

    /// 단색 오버레이
    struct SolidSource {
        bitmap: OverlayBitmap,
    }

    impl SolidSource {
        fn new(w: u32, h: u32, rgba: [u8; 4]) -> Self {
            let mut bitmap = OverlayBitmap::new(w, h).unwrap();
            bitmap.fill_rect(0, 0, w, h, rgba);
            Self { bitmap }
        }
    }

    impl OverlaySource for SolidSource {
        fn render(&mut self, _frame_count: u64) -> FilterResult<&OverlayBitmap> {
            Ok(&self.bitmap)
        }

        fn bitmap(&self) -> &OverlayBitmap {
            &self.bitmap
        }
    }

    struct PanickingSource(OverlayBitmap);

    impl OverlaySource for PanickingSource {
        fn render(&mut self, frame_count: u64) -> FilterResult<&OverlayBitmap> {
            if frame_count % 2 == 0 {
                panic!("render exploded at {}", frame_count);
            }
            Err(FilterError::Render("backend unavailable".into()))
        }

        fn bitmap(&self) -> &OverlayBitmap {
            &self.0
        }
    }

    fn format(chroma: Fourcc, w: u32, h: u32) -> FormatInfo {
        FormatInfo { chroma, width: w, height: h, visible_width: w, visible_height: h }
    }

    fn quiet_config() -> FilterConfig {
        FilterConfig { dump_path: None, ..FilterConfig::default() }
    }

    fn active_instance(config: FilterConfig) -> FilterInstance {
        let mut inst = FilterInstance::new(config);
        inst.activate_with(format(Fourcc::RV32, 32, 32), Box::new(SolidSource::new(4, 4, [255, 0, 0, 255])))
            .unwrap();
        inst
    }

    #[test]
    fn test_lifecycle() {
        let mut inst = FilterInstance::new(quiet_config());
        assert_eq!(inst.state(), FilterState::Uninitialized);

        let mut buf = vec![0u8; 32 * 4 * 32];
        let mut plane = PlaneMut::from_slice(&mut buf, 128, 128, 32).unwrap();
        assert_eq!(inst.process_frame(&mut plane, Fourcc::RV32), FrameOutcome::Inactive);
        assert_eq!(inst.frame_count(), 0);

        inst.activate_with(format(Fourcc::RV32, 32, 32), Box::new(SolidSource::new(4, 4, [255, 0, 0, 255])))
            .unwrap();
        assert_eq!(inst.state(), FilterState::Active);
        assert_eq!(inst.geometry().map(|g| g.width), Some(32));

        // 중복 활성화 거부
        assert!(matches!(
            inst.activate_with(format(Fourcc::RV32, 32, 32), Box::new(SolidSource::new(1, 1, [0; 4]))),
            Err(FilterError::Activation(_))
        ));

        inst.close();
        inst.close();
        assert_eq!(inst.state(), FilterState::Closed);
        assert!(inst.geometry().is_none());
        assert!(inst.activate(format(Fourcc::RV32, 32, 32)).is_err());
        assert_eq!(inst.process_frame(&mut plane, Fourcc::RV32), FrameOutcome::Inactive);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_close_before_activate_is_noop() {
        let mut inst = FilterInstance::new(quiet_config());
        inst.close();
        assert_eq!(inst.state(), FilterState::Uninitialized);

        inst.activate_with(format(Fourcc::RV32, 32, 32), Box::new(SolidSource::new(4, 4, [0, 255, 0, 255])))
            .unwrap();
        assert_eq!(inst.state(), FilterState::Active);
        inst.close();
        assert_eq!(inst.state(), FilterState::Closed);
    }

    #[test]
    fn test_reject_frame_counts() {
        let mut inst = FilterInstance::new(quiet_config());
        assert_eq!(inst.reject_frame("bad plane"), FrameOutcome::Inactive);
        assert_eq!(inst.frame_count(), 0);
        assert_eq!(inst.fault_count(), 0);

        let mut inst = active_instance(quiet_config());
        assert_eq!(inst.reject_frame("bad plane"), FrameOutcome::PassThrough);
        assert_eq!((inst.frame_count(), inst.fault_count()), (1, 1));

        let mut buf = vec![0u8; 32 * 4 * 32];
        let mut plane = PlaneMut::from_slice(&mut buf, 128, 128, 32).unwrap();
        assert!(matches!(inst.process_frame(&mut plane, Fourcc::RV32), FrameOutcome::Composited { .. }));
        assert_eq!(inst.frame_count(), 2);
    }

    #[test]
    fn test_counter_and_composite() {
        let mut inst = active_instance(quiet_config());
        let mut buf = vec![0u8; 32 * 4 * 32];
        for expected in 1..=3 {
            let mut plane = PlaneMut::from_slice(&mut buf, 128, 128, 32).unwrap();
            let outcome = inst.process_frame(&mut plane, Fourcc::RV32);
            assert_eq!(outcome, FrameOutcome::Composited { width: 4, height: 4 });
            assert_eq!(inst.frame_count(), expected);
        }
        // RV32 = BGRX: 빨강은 세 번째 바이트
        let px = 10 * 128 + 10 * 4;
        assert_eq!(&buf[px..px + 3], &[0, 0, 255]);
    }

    #[test]
    fn test_unknown_format_passes_buffer() {
        let mut inst = active_instance(quiet_config());
        let mut buf = vec![9u8; 64 * 64];
        for _ in 0..2 {
            let mut plane = PlaneMut::from_slice(&mut buf, 64, 64, 64).unwrap();
            assert_eq!(
                inst.process_frame(&mut plane, Fourcc::from_chars(*b"ZZZZ")),
                FrameOutcome::Skipped(SkipReason::UnknownFormat)
            );
        }
        assert!(inst.unknown_format_logged);
        assert!(buf.iter().all(|&b| b == 9));
    }

    #[test]
    fn test_faults_pass_through() {
        let mut inst = FilterInstance::new(FilterConfig { fault_log_interval: 2, ..quiet_config() });
        let blank = OverlayBitmap::new(1, 1).unwrap();
        inst.activate_with(format(Fourcc::RV32, 32, 32), Box::new(PanickingSource(blank)))
            .unwrap();

        let mut buf = vec![3u8; 32 * 4 * 32];
        for _ in 0..4 {
            let mut plane = PlaneMut::from_slice(&mut buf, 128, 128, 32).unwrap();
            assert_eq!(inst.process_frame(&mut plane, Fourcc::RV32), FrameOutcome::PassThrough);
        }
        assert_eq!(inst.fault_count(), 4);
        assert_eq!(inst.state(), FilterState::Active);
        assert!(buf.iter().all(|&b| b == 3));
    }

    #[test]
    fn test_dump_first_composited_frame_only() {
        let dir = std::env::temp_dir().join(format!("rust_overlay_dump_{}", std::process::id()));
        let path = dir.join("overlay.png");
        let _ = std::fs::remove_dir_all(&dir);
        let config = FilterConfig { dump_path: Some(path.clone()), ..FilterConfig::default() };
        let mut inst = active_instance(config);

        // 너무 작은 프레임: 잘려서 덤프 안 됨
        let mut small = vec![0u8; 8 * 4 * 8];
        let mut plane = PlaneMut::from_slice(&mut small, 32, 32, 8).unwrap();
        assert_eq!(
            inst.process_frame(&mut plane, Fourcc::RV32),
            FrameOutcome::Skipped(SkipReason::Clipped)
        );
        assert!(!path.exists());

        let mut buf = vec![0u8; 32 * 4 * 32];
        let mut plane = PlaneMut::from_slice(&mut buf, 128, 128, 32).unwrap();
        assert!(matches!(inst.process_frame(&mut plane, Fourcc::RV32), FrameOutcome::Composited { .. }));
        assert!(path.exists());

        std::fs::remove_file(&path).unwrap();
        let mut plane = PlaneMut::from_slice(&mut buf, 128, 128, 32).unwrap();
        inst.process_frame(&mut plane, Fourcc::RV32);
        assert!(!path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_dump_failure_is_not_retried() {
        let dir = std::env::temp_dir().join(format!("rust_overlay_dump_fail_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        // 상위 경로가 일반 파일이라 디렉터리 생성 실패
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("overlay.png");
        let config = FilterConfig { dump_path: Some(path.clone()), ..FilterConfig::default() };
        let mut inst = active_instance(config);
        assert!(inst.dump_pending);

        let mut buf = vec![0u8; 32 * 4 * 32];
        let mut plane = PlaneMut::from_slice(&mut buf, 128, 128, 32).unwrap();
        assert!(matches!(inst.process_frame(&mut plane, Fourcc::RV32), FrameOutcome::Composited { .. }));
        assert!(!inst.dump_pending);
        assert_eq!(inst.fault_count(), 0);

        // 경로가 쓸 수 있게 바뀌어도 다시 시도하지 않음
        std::fs::remove_file(&blocker).unwrap();
        std::fs::create_dir_all(&blocker).unwrap();
        let mut plane = PlaneMut::from_slice(&mut buf, 128, 128, 32).unwrap();
        assert!(matches!(inst.process_frame(&mut plane, Fourcc::RV32), FrameOutcome::Composited { .. }));
        assert!(!path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_activate_with_diagnostic_overlay() {
        let mut inst = FilterInstance::new(quiet_config());
        inst.activate(format(Fourcc::RGBA, 640, 360)).unwrap();

        let mut buf = vec![0u8; 640 * 4 * 360];
        let mut plane = PlaneMut::from_slice(&mut buf, 2560, 2560, 360).unwrap();
        assert_eq!(
            inst.process_frame(&mut plane, Fourcc::RGBA),
            FrameOutcome::Composited { width: 300, height: 90 }
        );
        // 패널 배경 (반투명 검정) 위 → 0 유지, 알파 바이트는 건드리지 않음
        let px = 80 * 2560 + 290 * 4;
        assert_eq!(buf[px + 3], 0);
    }
}
