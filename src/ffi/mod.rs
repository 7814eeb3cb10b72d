// FFI 모듈: 호스트(VLC)가 dlopen 후 호출하는 C ABI 함수들

pub mod filter;
pub mod module;
pub mod pinned;
pub mod types;

pub use filter::{close_filter, filter_video, open_filter, FILTER_OPERATIONS};
pub use module::{vlc_entry, vlc_entry_api_version, vlc_entry_copyright, ModuleBuilder, ModuleSink};

/// env_logger 초기화 (RUST_LOG, 기본 info). 두 번째 호출부터는 무시
pub(crate) fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}
