use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context};
use chrono::{DateTime, Local};
use exif::{Field, In, Tag, Value};
use img_parts::jpeg::{Jpeg, JpegSegment};
use img_parts::png::{Png, PngChunk};
use img_parts::{Bytes, ImageEXIF};
use log::debug;

/// EXIF stores timestamps as colon-separated ASCII, e.g. `2020:06:15 12:00:00`.
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// The capture-date tags rewritten by `write_capture_dates`.
const DATE_TAGS: [Tag; 2] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized];

/// JPEG APP1 EXIF payloads open with this prefix; the PNG `eXIf` chunk
/// carries the bare block.
const EXIF_PREFIX: &[u8] = b"Exif\0\0";

const PNG_EXIF_CHUNK: [u8; 4] = *b"eXIf";
const PNG_END_CHUNK: [u8; 4] = *b"IEND";

enum ImageKind {
    Jpeg,
    Png,
}

fn image_kind(path: &Path) -> anyhow::Result<ImageKind> {
    match mime_guess::from_path(path).first() {
        Some(mime) if mime == mime_guess::mime::IMAGE_JPEG => Ok(ImageKind::Jpeg),
        Some(mime) if mime == mime_guess::mime::IMAGE_PNG => Ok(ImageKind::Png),
        Some(mime) => Err(anyhow!("unsupported file type {mime} for EXIF writing")),
        None => Err(anyhow!("unknown file type")),
    }
}

/// Rewrite `DateTimeOriginal` and `DateTimeDigitized` of the image at `path`
/// to `taken_at`, keeping every other metadata field and the image data
/// intact. Rewriting with the same timestamp again produces identical bytes.
pub fn write_capture_dates(path: &Path, taken_at: DateTime<Local>) -> anyhow::Result<()> {
    let kind = image_kind(path)?;
    let original = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let exif_block = dated_exif_block(&original, taken_at)?;

    let patched = match kind {
        ImageKind::Jpeg => {
            let mut jpeg = Jpeg::from_bytes(original.into())
                .map_err(|e| anyhow!("parsing JPEG structure: {e}"))?;
            let slot = exif_segment_slot(&jpeg);
            jpeg.set_exif(None);
            let mut contents = Vec::with_capacity(EXIF_PREFIX.len() + exif_block.len());
            contents.extend_from_slice(EXIF_PREFIX);
            contents.extend_from_slice(&exif_block);
            let segments = jpeg.segments_mut();
            let slot = slot.min(segments.len());
            segments.insert(slot, JpegSegment::new_with_contents(0xE1, Bytes::from(contents)));
            jpeg.encoder().bytes()
        }
        ImageKind::Png => {
            let mut png = Png::from_bytes(original.into())
                .map_err(|e| anyhow!("parsing PNG structure: {e}"))?;
            png.set_exif(None);
            let chunks = png.chunks_mut();
            let slot = chunks
                .iter()
                .position(|chunk| chunk.kind() == PNG_END_CHUNK)
                .unwrap_or(chunks.len());
            chunks.insert(slot, PngChunk::new(PNG_EXIF_CHUNK, exif_block));
            png.encoder().bytes()
        }
    };

    fs::write(path, patched).with_context(|| format!("writing {}", path.display()))
}

/// Which segment slot the rewritten EXIF APP1 (marker `0xE1`) goes into:
/// wherever the old one sat, or after the leading APPn run for files that
/// never had one. `set_exif(Some(..))` inserts at a fixed index and panics
/// on containers with fewer segments, so the insert is done by hand.
fn exif_segment_slot(jpeg: &Jpeg) -> usize {
    let segments = jpeg.segments();
    segments
        .iter()
        .position(|s| s.marker() == 0xE1 && s.contents().starts_with(EXIF_PREFIX))
        .or_else(|| {
            segments
                .iter()
                .position(|s| !(0xE0..=0xEF).contains(&s.marker()))
        })
        .unwrap_or(segments.len())
}

/// Serialize an EXIF block carrying `taken_at` in the capture-date tags plus
/// every other field the file already had.
fn dated_exif_block(original: &[u8], taken_at: DateTime<Local>) -> anyhow::Result<Bytes> {
    let mut fields: Vec<Field> = Vec::new();
    if let Ok(existing) = exif::Reader::new().read_from_container(&mut Cursor::new(original)) {
        for field in existing.fields() {
            if DATE_TAGS.contains(&field.tag) {
                continue;
            }
            fields.push(Field {
                tag: field.tag,
                ifd_num: field.ifd_num,
                value: field.value.clone(),
            });
        }
    }
    debug!("keeping {} existing EXIF field(s)", fields.len());

    let stamp = taken_at.format(EXIF_DATE_FORMAT).to_string();
    for tag in DATE_TAGS {
        fields.push(Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![stamp.as_bytes().to_vec()]),
        });
    }

    let mut writer = exif::experimental::Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buffer = Cursor::new(Vec::new());
    // false = big-endian TIFF, the standard EXIF byte order
    writer
        .write(&mut buffer, false)
        .map_err(|e| anyhow!("serializing EXIF block: {e}"))?;

    Ok(Bytes::from(buffer.into_inner()))
}
