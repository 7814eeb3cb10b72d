// 오버레이 비트맵: 고정 크기 RGBA8, row-major, straight alpha

use std::path::Path;

use crate::error::{FilterError, FilterResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayBitmap {
    width: u32,
    height: u32,
    /// RGBA 데이터 (width * height * 4 bytes)
    rgba_data: Vec<u8>,
}

impl OverlayBitmap {
    /// 완전 투명 비트맵 생성
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::invalid(format!("overlay size {}x{}", width, height)));
        }
        Ok(Self {
            width,
            height,
            rgba_data: vec![0u8; (width as usize) * (height as usize) * 4],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba_data
    }

    pub fn as_rgba_mut(&mut self) -> &mut [u8] {
        &mut self.rgba_data
    }

    /// (x, y)의 RGBA: 범위 밖이면 None
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let p = &self.rgba_data[idx..idx + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// 사각형 영역을 단색으로 덮어씀 (블렌딩 없음, 비트맵 밖은 잘림)
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgba: [u8; 4]) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        let stride = self.width as usize * 4;
        for row in y..y_end {
            let start = row as usize * stride;
            for col in x..x_end {
                let idx = start + col as usize * 4;
                self.rgba_data[idx..idx + 4].copy_from_slice(&rgba);
            }
        }
    }

    /// PNG로 저장 (진단 덤프용). 상위 디렉터리가 없으면 생성
    pub fn save_png(&self, path: &Path) -> FilterResult<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| FilterError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        image::save_buffer_with_format(
            path,
            &self.rgba_data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }
}
