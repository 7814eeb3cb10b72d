// 필터 모듈: 설정 + 인스턴스 수명주기

pub mod config;
pub mod instance;

pub use config::FilterConfig;
pub use instance::{FilterInstance, FilterState, FrameOutcome};
