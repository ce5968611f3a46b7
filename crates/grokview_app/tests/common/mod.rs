#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;

use grokview_app::OverviewFeature;
use grokview_engine::{Engine, EngineConfig};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const PNG_SIGNATURE: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R',
];

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn spawn_feature() -> OverviewFeature {
    init_logging();
    OverviewFeature::spawn(Engine::new(EngineConfig::default()))
}

pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    for (entry_name, bytes) in entries {
        zip.start_file(*entry_name, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
    path
}

/// A small conversation export: one picture, one transcript, one opaque blob.
pub fn sample_zip(dir: &Path, name: &str) -> String {
    let path = write_zip(
        dir,
        name,
        &[
            ("images/picture.png", PNG_SIGNATURE),
            ("chat.json", br#"{"messages": []}"#.as_slice()),
            ("blob", [0x00, 0xFF, 0x00, 0x13, 0x37].as_slice()),
        ],
    );
    path.to_string_lossy().into_owned()
}
