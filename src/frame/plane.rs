// 호스트 소유 평면 메모리에 대한 비소유 뷰: 할당/해제하지 않음

use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::{FilterError, FilterResult};
use crate::native::Plane;

/// 쓰기 가능한 평면 뷰 (pitch × lines 바이트 영역)
#[derive(Debug)]
pub struct PlaneMut<'a> {
    base: NonNull<u8>,
    pitch: usize,
    lines: usize,
    visible_pitch: usize,
    visible_lines: usize,
    _buffer: PhantomData<&'a mut [u8]>,
}

impl<'a> PlaneMut<'a> {
    /// 소유한 버퍼 위의 뷰 (길이 검사)
    pub fn from_slice(
        buffer: &'a mut [u8],
        pitch: usize,
        visible_pitch: usize,
        visible_lines: usize,
    ) -> FilterResult<Self> {
        if pitch == 0 {
            return Err(FilterError::invalid("pitch must be positive"));
        }
        let lines = buffer.len() / pitch;
        check_geometry(pitch, lines, visible_pitch, visible_lines)?;
        let base = NonNull::new(buffer.as_mut_ptr())
            .ok_or_else(|| FilterError::invalid("empty buffer"))?;
        Ok(Self { base, pitch, lines, visible_pitch, visible_lines, _buffer: PhantomData })
    }

    /// 호스트 평면 위의 뷰
    ///
    /// # Safety
    /// `plane.pixels`는 최소 `pitch * lines` 바이트의 쓰기 가능한 메모리를 가리키고,
    /// 뷰가 살아있는 동안 다른 곳에서 접근하지 않아야 함
    pub unsafe fn from_plane(plane: &Plane) -> FilterResult<Self> {
        Self::from_raw(
            plane.pixels,
            plane.pitch,
            plane.lines,
            plane.visible_pitch,
            plane.visible_lines,
        )
    }

    /// # Safety
    /// [`PlaneMut::from_plane`]과 동일
    pub unsafe fn from_raw(
        pixels: *mut u8,
        pitch: i32,
        lines: i32,
        visible_pitch: i32,
        visible_lines: i32,
    ) -> FilterResult<Self> {
        let base = NonNull::new(pixels).ok_or_else(|| FilterError::invalid("null plane pixels"))?;
        let to_usize = |v: i32, name: &str| {
            usize::try_from(v).map_err(|_| FilterError::invalid(format!("negative {}: {}", name, v)))
        };
        let pitch = to_usize(pitch, "pitch")?;
        let lines = to_usize(lines, "lines")?;
        let visible_pitch = to_usize(visible_pitch, "visible pitch")?;
        let visible_lines = to_usize(visible_lines, "visible lines")?;
        if pitch == 0 {
            return Err(FilterError::invalid("pitch must be positive"));
        }
        check_geometry(pitch, lines, visible_pitch, visible_lines)?;
        Ok(Self { base, pitch, lines, visible_pitch, visible_lines, _buffer: PhantomData })
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn visible_pitch(&self) -> usize {
        self.visible_pitch
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    /// y번째 줄의 visible 부분 (`visible_pitch` 바이트)
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.visible_lines {
            return None;
        }
        // SAFETY: y < visible_lines <= lines, visible_pitch <= pitch 이므로
        // [y*pitch, y*pitch + visible_pitch) 는 생성 시 보장된 영역 안
        unsafe {
            let start = self.base.as_ptr().add(y * self.pitch);
            Some(std::slice::from_raw_parts_mut(start, self.visible_pitch))
        }
    }
}

fn check_geometry(
    pitch: usize,
    lines: usize,
    visible_pitch: usize,
    visible_lines: usize,
) -> FilterResult<()> {
    if visible_pitch > pitch {
        return Err(FilterError::invalid(format!(
            "visible pitch {} exceeds pitch {}",
            visible_pitch, pitch
        )));
    }
    if visible_lines > lines {
        return Err(FilterError::invalid(format!(
            "visible lines {} exceed lines {}",
            visible_lines, lines
        )));
    }
    Ok(())
}
