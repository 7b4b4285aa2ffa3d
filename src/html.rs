//! Renders a resolved image as an HTML fragment with an embedded data URI.

use crate::error::ImageError;
use crate::resolver::ResolvedImage;
use crate::sizing::Bounds;
use crate::sizing::SizeDecision;
use crate::sizing::SizeMode;
use crate::sizing::fit_within;
use base64::Engine as _;
use base64::engine::general_purpose;
use image::DynamicImage;
use image::ImageFormat;
use image::ImageReader;
use image::imageops::FilterType;
use std::io::Cursor;
use tracing::debug;

/// Label used when the raw bytes do not match any known format.
pub const FALLBACK_MIME: &str = "image/jpeg";

/// Builds `<img>` fragments for one plugin.
#[derive(Clone, Copy, Debug)]
pub struct HtmlImageEmitter {
    pub bounds: Bounds,
    /// Format thumbnails are re-encoded to
    pub thumbnail_format: ImageFormat,
}

impl HtmlImageEmitter {
    #[must_use]
    pub fn new(bounds: Bounds, thumbnail_format: ImageFormat) -> Self {
        HtmlImageEmitter {
            bounds,
            thumbnail_format,
        }
    }

    /// Render `image` according to `decision`, wrapped in a link when one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if a thumbnail has to be made and the image cannot be
    /// decoded or re-encoded.
    pub fn emit(
        &self,
        image: &ResolvedImage,
        decision: &SizeDecision,
        link: Option<&str>,
    ) -> Result<String, ImageError> {
        let tag = match decision.mode {
            SizeMode::InlineRaw => {
                let mime = image::guess_format(&image.bytes)
                    .map_or(FALLBACK_MIME, |format| format.to_mime_type());
                img_tag(&data_uri(mime, &image.bytes), &decision.html_attributes)
            }
            SizeMode::Thumbnail => {
                let thumbnail = make_thumbnail(&image.bytes, self.bounds, self.thumbnail_format)?;
                debug!(
                    original = image.bytes.len(),
                    thumbnail = thumbnail.len(),
                    "Re-encoded thumbnail"
                );
                img_tag(
                    &data_uri(self.thumbnail_format.to_mime_type(), &thumbnail),
                    "",
                )
            }
        };
        Ok(match link {
            Some(href) => wrap_link(href, &tag),
            None => tag,
        })
    }
}

#[must_use]
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};charset=utf-8;base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

#[must_use]
pub fn img_tag(src: &str, attributes: &str) -> String {
    format!("<img src=\"{src}\" {attributes} />")
}

#[must_use]
pub fn wrap_link(href: &str, inner: &str) -> String {
    format!("<a href=\"{}\">{inner}</a>", escape_attribute(href))
}

/// Escape text for use inside a double-quoted HTML attribute.
#[must_use]
pub fn escape_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Decode `bytes`, scale it to fit `bounds` with Lanczos3 and encode it as `format`.
///
/// # Errors
///
/// Returns an error if decoding or encoding fails.
pub fn make_thumbnail(
    bytes: &[u8],
    bounds: Bounds,
    format: ImageFormat,
) -> Result<Vec<u8>, ImageError> {
    let decode_error = |source| ImageError::Decode {
        origin: "thumbnail source".to_string(),
        source,
    };
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_error(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)?;

    let (width, height) = fit_within(img.width(), img.height(), bounds);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    // JPEG has no alpha channel
    let resized = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    } else {
        resized
    };

    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, format).map_err(ImageError::Encode)?;
    Ok(out.into_inner())
}
