#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

use image::{DynamicImage, ImageFormat, RgbImage};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub enum Entry<'a> {
    File(&'a str, Vec<u8>),
    Dated(&'a str, Vec<u8>, DateTime),
    /// Written uncompressed, so the payload appears verbatim in the file.
    Stored(&'a str, Vec<u8>),
    Dir(&'a str),
}

/// Writes a ZIP at `dir/name` with the given entries, in order.
pub fn write_zip(dir: &Path, name: &str, entries: Vec<Entry<'_>>) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in entries {
        match entry {
            Entry::File(entry_name, bytes) => {
                zip.start_file(entry_name, options).unwrap();
                zip.write_all(&bytes).unwrap();
            }
            Entry::Dated(entry_name, bytes, modified) => {
                zip.start_file(entry_name, options.last_modified_time(modified))
                    .unwrap();
                zip.write_all(&bytes).unwrap();
            }
            Entry::Stored(entry_name, bytes) => {
                zip.start_file(
                    entry_name,
                    options.compression_method(CompressionMethod::Stored),
                )
                .unwrap();
                zip.write_all(&bytes).unwrap();
            }
            Entry::Dir(entry_name) => {
                zip.add_directory(entry_name, options).unwrap();
            }
        }
    }
    zip.finish().unwrap();
    path
}

/// Overwrites the first occurrence of `needle` in the file at `path`,
/// shifted by `offset` bytes, with `replacement`.
pub fn overwrite_at(path: &Path, needle: &[u8], offset: isize, replacement: &[u8]) {
    let mut bytes = std::fs::read(path).unwrap();
    let found = bytes
        .windows(needle.len())
        .position(|window| window == needle)
        .expect("needle present in fixture");
    let start = found.checked_add_signed(offset).unwrap();
    bytes[start..start + replacement.len()].copy_from_slice(replacement);
    std::fs::write(path, bytes).unwrap();
}

pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut image = RgbImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        *pixel = image::Rgb([(x * 7) as u8, (y * 13) as u8, 128]);
    }
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Jpeg)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Png)
}

/// Bytes no signature or text heuristic recognises.
pub fn garbage() -> Vec<u8> {
    vec![0x00, 0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x13, 0x37, 0x00, 0x42]
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
