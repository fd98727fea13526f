use std::path::PathBuf;

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    3000
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_stream_path() -> String {
    "/__fob_sse__".to_string()
}

pub fn default_keep_alive_secs() -> u64 {
    30
}

pub fn default_retry_ms() -> u64 {
    500
}

pub fn default_queue_capacity() -> usize {
    16
}

pub fn default_watch() -> Vec<PathBuf> {
    vec![PathBuf::from("src")]
}

pub fn default_debounce_ms() -> u64 {
    100
}
