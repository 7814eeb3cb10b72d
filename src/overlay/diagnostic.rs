// 진단 오버레이: 반투명 패널 + 3줄 텍스트를 SVG로 그려 resvg로 래스터화
// resvg 출력은 premultiplied → 비트맵에는 straight alpha로 저장

use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use resvg::tiny_skia;

use super::{OverlayBitmap, OverlaySource};
use crate::error::{FilterError, FilterResult};
use crate::filter::FilterConfig;

/// 배경 (0, 0, 0, 180)
const BACKGROUND: ([u8; 3], u8) = ([0, 0, 0], 180);
/// 테두리 (100, 100, 100, 200), 2px
const BORDER: ([u8; 3], u8) = ([100, 100, 100], 200);
const BORDER_WIDTH: u32 = 2;
const TEXT_X: f32 = 10.0;
const TEXT_TOP: f32 = 10.0;
const LINE_HEIGHT: f32 = 22.0;

/// 시스템 폰트 DB: 로딩 비용이 커서 프로세스당 1회
fn shared_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTDB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("[OVERLAY] fontdb loaded: {} faces", db.len());
            Arc::new(db)
        })
        .clone()
}

pub struct DiagnosticOverlay {
    bitmap: OverlayBitmap,
    pixmap: tiny_skia::Pixmap,
    options: usvg::Options<'static>,
    font_size: f32,
    /// 3번째 줄 (지오메트리 + fourcc)
    detail: String,
}

impl DiagnosticOverlay {
    pub fn new(config: &FilterConfig, detail: impl Into<String>) -> FilterResult<Self> {
        let (width, height) = config.overlay_size;
        let bitmap = OverlayBitmap::new(width, height)?;
        let pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| FilterError::Render(format!("pixmap {}x{}", width, height)))?;
        let options = usvg::Options {
            fontdb: shared_fontdb(),
            ..Default::default()
        };

        log::info!("[OVERLAY] DiagnosticOverlay created: {}x{}", width, height);

        Ok(Self {
            bitmap,
            pixmap,
            options,
            font_size: config.font_size,
            detail: detail.into(),
        })
    }

    fn build_svg(&self, frame_count: u64) -> String {
        let w = self.bitmap.width();
        let h = self.bitmap.height();
        let mut svg = String::with_capacity(1024);

        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        push_rect(&mut svg, 0, 0, w, h, BACKGROUND);
        // 테두리: 상, 하, 좌, 우
        push_rect(&mut svg, 0, 0, w, BORDER_WIDTH, BORDER);
        push_rect(&mut svg, 0, h.saturating_sub(BORDER_WIDTH), w, BORDER_WIDTH, BORDER);
        push_rect(&mut svg, 0, 0, BORDER_WIDTH, h, BORDER);
        push_rect(&mut svg, w.saturating_sub(BORDER_WIDTH), 0, BORDER_WIDTH, h, BORDER);

        let lines = [
            format!("Hello from {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Frame: {}", frame_count),
            self.detail.clone(),
        ];
        for (i, line) in lines.iter().enumerate() {
            // SVG y는 baseline 기준
            let y = TEXT_TOP + self.font_size + LINE_HEIGHT * i as f32;
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" font-family="monospace" font-size="{}" fill="white">{}</text>"#,
                TEXT_X,
                y,
                self.font_size,
                escape_xml(line)
            );
        }
        svg.push_str("</svg>");
        svg
    }
}

impl OverlaySource for DiagnosticOverlay {
    fn render(&mut self, frame_count: u64) -> FilterResult<&OverlayBitmap> {
        let svg = self.build_svg(frame_count);
        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| FilterError::Render(e.to_string()))?;

        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut self.pixmap.as_mut());

        for (dst, src) in self
            .bitmap
            .as_rgba_mut()
            .chunks_exact_mut(4)
            .zip(self.pixmap.pixels())
        {
            let c = src.demultiply();
            dst.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(&self.bitmap)
    }

    fn bitmap(&self) -> &OverlayBitmap {
        &self.bitmap
    }
}

fn push_rect(svg: &mut String, x: u32, y: u32, w: u32, h: u32, (rgb, alpha): ([u8; 3], u8)) {
    let _ = write!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="rgb({},{},{})" fill-opacity="{:.4}"/>"#,
        x,
        y,
        w,
        h,
        rgb[0],
        rgb[1],
        rgb[2],
        alpha as f32 / 255.0
    );
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
