//! Single-image PDF encoding
//!
//! The snapshot is JPEG-encoded and embedded as the only XObject of a
//! square page, scaled to fill it.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use tiny_skia::Pixmap;

use crate::core::errors::{CardError, CardResult};

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const PAGE_ID: Ref = Ref::new(3);
const IMAGE_ID: Ref = Ref::new(4);
const CONTENT_ID: Ref = Ref::new(5);
const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Opaque RGB copy of a premultiplied pixmap
fn to_rgb(pixmap: &Pixmap) -> CardResult<RgbImage> {
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let color = px.demultiply();
            [color.red(), color.green(), color.blue()]
        })
        .collect();
    RgbImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| CardError::Export("snapshot buffer has the wrong size".into()))
}

pub fn encode_jpeg(pixmap: &Pixmap, quality: u8) -> CardResult<Vec<u8>> {
    let rgb = to_rgb(pixmap)?;
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CardError::Export(format!("JPEG encoding failed: {e}")))?;
    Ok(out)
}

/// One page of `page_size_pt` points, showing the JPEG edge to edge
pub fn single_image_pdf(jpeg: &[u8], width: u32, height: u32, page_size_pt: f32) -> Vec<u8> {
    let mut pdf = Pdf::new();
    pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
    pdf.pages(PAGE_TREE_ID).kids([PAGE_ID]).count(1);

    let mut page = pdf.page(PAGE_ID);
    page.media_box(Rect::new(0.0, 0.0, page_size_pt, page_size_pt));
    page.parent(PAGE_TREE_ID);
    page.contents(CONTENT_ID);
    page.resources().x_objects().pair(IMAGE_NAME, IMAGE_ID);
    page.finish();

    let mut image = pdf.image_xobject(IMAGE_ID, jpeg);
    image.filter(Filter::DctDecode);
    image.width(width as i32);
    image.height(height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([page_size_pt, 0.0, 0.0, page_size_pt, 0.0, 0.0]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(CONTENT_ID, &content.finish());

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_has_soi_marker() {
        let mut pixmap = Pixmap::new(16, 16).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        let jpeg = encode_jpeg(&pixmap, 90).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_pdf_structure() {
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        pixmap.fill(tiny_skia::Color::BLACK);
        let jpeg = encode_jpeg(&pixmap, 90).unwrap();
        let bytes = single_image_pdf(&jpeg, 8, 8, 576.0);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("/DCTDecode"));
        assert!(text.contains("/MediaBox"));
        assert!(text.contains("/Count 1"));
        let pages = text.matches("/Type /Page").count() - text.matches("/Type /Pages").count();
        assert_eq!(pages, 1);
    }
}
