// 에러 타입: 프레임 경로의 모든 실패는 "입력 그대로 반환"으로 수렴

use std::path::PathBuf;

pub type FilterResult<T> = Result<T, FilterError>;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// 잘못된 인자 (plane 인덱스 범위 초과, 음수 pitch 등)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// 활성화 실패: 필터 사용 불가
    #[error("activation failed: {0}")]
    Activation(String),

    /// vlc_set 호출이 0이 아닌 값을 반환
    #[error("module registration failed at property 0x{property:x} (code {code})")]
    Registration { property: i32, code: i32 },

    /// 오버레이 렌더링 실패
    #[error("overlay render failed: {0}")]
    Render(String),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image encode failed: {0}")]
    Image(#[from] image::ImageError),
}

impl FilterError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn activation(msg: impl Into<String>) -> Self {
        Self::Activation(msg.into())
    }
}
