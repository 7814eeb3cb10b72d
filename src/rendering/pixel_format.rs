// 픽셀 포맷 분류: fourcc → (bytes/pixel, 채널 순서, 알파 유무)

use std::fmt;

/// 4 ASCII 문자를 little-endian으로 묶은 32비트 코드 (VLC_FOURCC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fourcc(pub u32);

impl Fourcc {
    /// 32-bit RGB (실제 메모리 순서 BGRX)
    pub const RV32: Fourcc = Fourcc::from_chars(*b"RV32");
    /// 24-bit RGB (실제 메모리 순서 BGR)
    pub const RV24: Fourcc = Fourcc::from_chars(*b"RV24");
    pub const RGBA: Fourcc = Fourcc::from_chars(*b"RGBA");
    pub const BGRA: Fourcc = Fourcc::from_chars(*b"BGRA");
    /// YUV 4:2:0 planar
    pub const I420: Fourcc = Fourcc::from_chars(*b"I420");
    pub const YV12: Fourcc = Fourcc::from_chars(*b"YV12");

    pub const fn from_chars(c: [u8; 4]) -> Self {
        Fourcc(u32::from_le_bytes(c))
    }

    pub const fn as_chars(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.as_chars() {
            let ch = if c.is_ascii_graphic() || c == b' ' { c as char } else { '.' };
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

/// 분류 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatInfo {
    /// 0이면 처리 불가: 합성 건너뜀
    pub bytes_per_pixel: u8,
    /// 메모리 순서가 B, G, R
    pub is_bgr: bool,
    pub has_alpha: bool,
}

impl PixelFormatInfo {
    pub const UNKNOWN: PixelFormatInfo = PixelFormatInfo::new(0, false, false);

    const fn new(bytes_per_pixel: u8, is_bgr: bool, has_alpha: bool) -> Self {
        Self { bytes_per_pixel, is_bgr, has_alpha }
    }

    pub fn is_processable(&self) -> bool {
        self.bytes_per_pixel != 0
    }
}

/// fourcc 분류 (순수 함수)
pub fn classify(code: Fourcc) -> PixelFormatInfo {
    match code {
        Fourcc::RV32 => PixelFormatInfo::new(4, true, false),
        Fourcc::RV24 => PixelFormatInfo::new(3, true, false),
        Fourcc::RGBA => PixelFormatInfo::new(4, false, true),
        Fourcc::BGRA => PixelFormatInfo::new(4, true, true),
        // Y plane만 다룸
        Fourcc::I420 | Fourcc::YV12 => PixelFormatInfo::new(1, false, false),
        _ => guess(code),
    }
}

/// 표에 없는 코드: 문자 패턴으로 추정 (best-effort, 항상 RGB 순서 / 알파 없음)
fn guess(code: Fourcc) -> PixelFormatInfo {
    let chars = code.as_chars();
    let contains = |pat: &[u8]| chars.windows(pat.len()).any(|w| w == pat);

    let bytes_per_pixel =
        if contains(b"32") || contains(b"RGBA") || contains(b"BGRA") || contains(b"ARGB") {
            4
        } else if contains(b"24") || contains(b"RGB") {
            3
        } else if chars.starts_with(b"I4") || chars.starts_with(b"YV") || chars.starts_with(b"NV") {
            1
        } else {
            0
        };

    PixelFormatInfo::new(bytes_per_pixel, false, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_values() {
        assert_eq!(Fourcc::RV32.0, 0x3233_5652);
        assert_eq!(Fourcc::RV24.0, 0x3432_5652);
        assert_eq!(Fourcc::RGBA.0, 0x4142_4752);
        assert_eq!(Fourcc::BGRA.0, 0x4152_4742);
        assert_eq!(Fourcc::I420.0, 0x3032_3449);
        assert_eq!(Fourcc::YV12.0, 0x3231_5659);
    }

    #[test]
    fn test_fourcc_display() {
        assert_eq!(Fourcc::I420.to_string(), "I420");
        assert_eq!(Fourcc(0x0000_4152).to_string(), "RA..");
    }

    #[test]
    fn test_known_formats() {
        assert_eq!(classify(Fourcc::RV32), PixelFormatInfo::new(4, true, false));
        assert_eq!(classify(Fourcc::RV24), PixelFormatInfo::new(3, true, false));
        assert_eq!(classify(Fourcc::RGBA), PixelFormatInfo::new(4, false, true));
        assert_eq!(classify(Fourcc::BGRA), PixelFormatInfo::new(4, true, true));
        assert_eq!(classify(Fourcc::I420), PixelFormatInfo::new(1, false, false));
        assert_eq!(classify(Fourcc::YV12), PixelFormatInfo::new(1, false, false));
    }

    #[test]
    fn test_heuristic_formats() {
        // ARGB → 4
        assert_eq!(classify(Fourcc::from_chars(*b"ARGB")).bytes_per_pixel, 4);
        // "XR32" 같은 변형
        assert_eq!(classify(Fourcc::from_chars(*b"XR32")).bytes_per_pixel, 4);
        // RGB + 1문자 → 3
        assert_eq!(classify(Fourcc::from_chars(*b"RGB3")).bytes_per_pixel, 3);
        assert_eq!(classify(Fourcc::from_chars(*b"RV24")).bytes_per_pixel, 3);
        // planar YUV 계열 → 1
        assert_eq!(classify(Fourcc::from_chars(*b"I422")).bytes_per_pixel, 1);
        assert_eq!(classify(Fourcc::from_chars(*b"NV12")).bytes_per_pixel, 1);
        assert_eq!(classify(Fourcc::from_chars(*b"YV16")).bytes_per_pixel, 1);

        let guessed = classify(Fourcc::from_chars(*b"ARGB"));
        assert!(!guessed.is_bgr);
        assert!(!guessed.has_alpha);
    }

    #[test]
    fn test_unknown_format() {
        let info = classify(Fourcc::from_chars(*b"D3D9"));
        assert_eq!(info, PixelFormatInfo::UNKNOWN);
        assert!(!info.is_processable());
        assert!(!classify(Fourcc(0)).is_processable());
    }
}
