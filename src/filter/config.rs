// 필터 설정: 기본값 + 환경 변수 오버라이드

use std::path::PathBuf;

use crate::rendering::Inset;

pub const ENV_DUMP_PATH: &str = "RUST_OVERLAY_DUMP_PATH";
pub const ENV_INSET: &str = "RUST_OVERLAY_INSET";
pub const ENV_LOG_EVERY: &str = "RUST_OVERLAY_LOG_EVERY";

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub inset: Inset,
    /// 오버레이 비트맵 크기 (width, height)
    pub overlay_size: (u32, u32),
    pub font_size: f32,
    /// 첫 합성 프레임의 PNG 덤프 경로. None이면 덤프 안 함
    pub dump_path: Option<PathBuf>,
    /// 처리 오류 로그 간격 (1번째, 그 후 N번째마다)
    pub fault_log_interval: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            inset: Inset::default(),
            overlay_size: (300, 90),
            font_size: 14.0,
            dump_path: Some(PathBuf::from("overlay_test.png")),
            fault_log_interval: 300,
        }
    }
}

impl FilterConfig {
    /// 기본값에 환경 변수 적용
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 잘못된 값은 경고 후 무시
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DUMP_PATH) {
            let path = path.trim();
            config.dump_path = (!path.is_empty()).then(|| PathBuf::from(path));
        }

        if let Some(raw) = lookup(ENV_INSET) {
            match parse_inset(&raw) {
                Some(inset) => config.inset = inset,
                None => log::warn!("[FILTER] ignoring {}={:?} (expected \"x,y\" or \"n\")", ENV_INSET, raw),
            }
        }

        if let Some(raw) = lookup(ENV_LOG_EVERY) {
            match raw.trim().parse::<u64>() {
                Ok(n) if n > 0 => config.fault_log_interval = n,
                _ => log::warn!("[FILTER] ignoring {}={:?}", ENV_LOG_EVERY, raw),
            }
        }

        config
    }
}

fn parse_inset(raw: &str) -> Option<Inset> {
    let mut parts = raw.split(',').map(|p| p.trim().parse::<usize>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(n)), None, None) => Some(Inset { x: n, y: n }),
        (Some(Ok(x)), Some(Ok(y)), None) => Some(Inset { x, y }),
        _ => None,
    }
}
