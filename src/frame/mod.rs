// 프레임 접근 모듈: 호스트 picture_t를 평면 단위로 해석

pub mod accessor;
pub mod plane;

pub use accessor::{first_cpu_plane, plane_at, FormatInfo, PictureLayout, PlaneInfo};
pub use plane::PlaneMut;
