use anyhow::{bail, Context, Result};
use arboard::Clipboard;
use tracing::{debug, info};

use crate::entry::Entry;

/// An uncompressed RGBA bitmap, as handed over by the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// What the system clipboard currently holds, in storable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardContent {
    Text(String),
    Image(Bitmap),
}

/// Read the current clipboard. Text wins over image when both are offered.
/// Returns `Ok(None)` if the clipboard holds neither.
pub fn read_clipboard() -> Result<Option<ClipboardContent>> {
    let mut clipboard = Clipboard::new().context("failed to access clipboard")?;

    match clipboard.get_text() {
        Ok(text) if !text.is_empty() => return Ok(Some(ClipboardContent::Text(text))),
        Ok(_) | Err(arboard::Error::ContentNotAvailable) => {}
        Err(e) => return Err(e).context("failed to read clipboard"),
    }

    let image_data = match clipboard.get_image() {
        Ok(img) => img,
        Err(arboard::Error::ContentNotAvailable) => return Ok(None),
        Err(e) => return Err(e).context("failed to read image from clipboard"),
    };
    debug!(
        "clipboard image read ({}x{})",
        image_data.width, image_data.height
    );
    Ok(Some(ClipboardContent::Image(Bitmap::new(
        image_data.width as u32,
        image_data.height as u32,
        image_data.bytes.into_owned(),
    ))))
}

/// Copy a history entry back onto the system clipboard.
///
/// On Linux the clipboard content is served by the process that set it, so
/// this blocks until another program takes the clipboard over. Returning
/// earlier would let the content vanish when the CLI exits.
pub fn write_entry(entry: &Entry) -> Result<()> {
    let mut clipboard = Clipboard::new().context("failed to access clipboard")?;
    match entry {
        Entry::Text(text) => {
            setter(&mut clipboard)
                .text(text.as_str())
                .context("failed to write to clipboard")?;
            info!("clipboard updated ({} chars)", text.len());
        }
        Entry::Image(png) => {
            let image_data = image_data_from_png(png)?;
            let (width, height) = (image_data.width, image_data.height);
            setter(&mut clipboard)
                .image(image_data)
                .context("failed to write image to clipboard")?;
            info!(
                "clipboard image set ({}x{}, {} bytes PNG)",
                width,
                height,
                png.len()
            );
        }
    }
    Ok(())
}

fn setter(clipboard: &mut Clipboard) -> arboard::Set<'_> {
    let set = clipboard.set();
    #[cfg(target_os = "linux")]
    let set = {
        use arboard::SetExtLinux;
        set.wait()
    };
    set
}

fn image_data_from_png(png_bytes: &[u8]) -> Result<arboard::ImageData<'static>> {
    let bitmap = decode_png(png_bytes)?;
    Ok(arboard::ImageData {
        width: bitmap.width as usize,
        height: bitmap.height as usize,
        bytes: bitmap.rgba.into(),
    })
}

/// Encode a bitmap to PNG bytes.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>> {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder;
    use std::io::Cursor;

    let expected = bitmap.width as usize * bitmap.height as usize * 4;
    if bitmap.rgba.len() != expected {
        bail!(
            "bitmap buffer is {} bytes, expected {} for {}x{} RGBA",
            bitmap.rgba.len(),
            expected,
            bitmap.width,
            bitmap.height
        );
    }

    let mut buf = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(
            &bitmap.rgba,
            bitmap.width,
            bitmap.height,
            image::ExtendedColorType::Rgba8,
        )
        .context("failed to encode PNG")?;
    Ok(buf.into_inner())
}

/// Decode PNG bytes to an RGBA bitmap.
pub fn decode_png(png_bytes: &[u8]) -> Result<Bitmap> {
    let img = image::load_from_memory_with_format(png_bytes, image::ImageFormat::Png)
        .context("failed to decode PNG")?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Bitmap::new(width, height, rgba.into_raw()))
}

/// Get dimensions from PNG bytes without fully decoding.
pub fn png_dimensions(png_bytes: &[u8]) -> Result<(u32, u32)> {
    use std::io::Cursor;
    let reader = image::ImageReader::with_format(Cursor::new(png_bytes), image::ImageFormat::Png);
    let (w, h) = reader
        .into_dimensions()
        .context("failed to read PNG dimensions")?;
    Ok((w, h))
}
