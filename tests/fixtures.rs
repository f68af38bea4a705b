#![allow(dead_code)]
use std::path::PathBuf;

use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

// Tests run concurrently, so logger setup has to happen exactly once.
pub fn ensure_env_logger_initialized() {
    use std::io::Write;

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .is_test(true)
            .init();
    });
}

pub fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .canonicalize()
        .unwrap()
}

pub fn inline_sample() -> PathBuf {
    samples_dir().join("inline_linear.xml")
}

pub fn wrapper_sample() -> PathBuf {
    samples_dir().join("wrapper.xml")
}

pub fn sample_with_a_bad_media_width() -> PathBuf {
    samples_dir().join("media_without_width.xml")
}

pub fn read_sample(path: PathBuf) -> String {
    std::fs::read_to_string(path).unwrap()
}
