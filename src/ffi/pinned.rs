// 프로세스 수명 C 문자열: 호스트가 포인터를 계속 보관하므로 해제하지 않음

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::sync::{Mutex, OnceLock};

use crate::error::{FilterError, FilterResult};

fn registry() -> &'static Mutex<HashMap<String, &'static CStr>> {
    static PINNED: OnceLock<Mutex<HashMap<String, &'static CStr>>> = OnceLock::new();
    PINNED.get_or_init(|| Mutex::new(HashMap::new()))
}

/// 같은 문자열은 한 번만 할당 (이후 같은 주소 반환)
pub fn pin(text: &str) -> FilterResult<&'static CStr> {
    let mut map = registry()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(existing) = map.get(text).copied() {
        return Ok(existing);
    }
    let owned = CString::new(text)
        .map_err(|_| FilterError::invalid(format!("interior NUL in {:?}", text)))?;
    let leaked: &'static CStr = Box::leak(owned.into_boxed_c_str());
    map.insert(text.to_string(), leaked);
    Ok(leaked)
}
