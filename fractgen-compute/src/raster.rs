//! Raster serialization through the `image` codecs.

use crate::pixel_buffer::PixelBuffer;
use fractgen_core::{FractalError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const JPEG_QUALITY: u8 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    /// Alpha is dropped.
    Jpeg,
}

impl RasterFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("png") => Ok(RasterFormat::Png),
            Some("jpg") | Some("jpeg") => Ok(RasterFormat::Jpeg),
            _ => Err(FractalError::Encode(format!(
                "cannot infer an image format from '{}'",
                path.display()
            ))),
        }
    }
}

impl PixelBuffer {
    /// Serialize the raster as `format` into `writer`.
    pub fn encode<W: Write>(&self, format: RasterFormat, writer: W) -> Result<()> {
        let (width, height) = (self.width(), self.height());
        let encoded = match format {
            RasterFormat::Png => PngEncoder::new(writer).write_image(
                self.as_bytes(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            RasterFormat::Jpeg => {
                let rgb: Vec<u8> = self
                    .as_bytes()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect();
                JpegEncoder::new_with_quality(writer, JPEG_QUALITY).write_image(
                    &rgb,
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )
            }
        };
        encoded.map_err(|e| FractalError::Encode(e.to_string()))
    }

    /// Write the raster to `path`, choosing the format from its extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = RasterFormat::from_path(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        self.encode(format, &mut writer)?;
        writer.flush()?;
        log::debug!(
            "wrote {}x{} {:?} to {}",
            self.width(),
            self.height(),
            format,
            path.display()
        );
        Ok(())
    }
}
