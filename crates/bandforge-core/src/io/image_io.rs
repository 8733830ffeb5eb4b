use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, ImageBuffer, ImageFormat, Pixel, RgbImage, RgbaImage};
use ndarray::Array2;
use num_traits::AsPrimitive;
use tracing::info;

use crate::consts::{COLOR_CHANNEL_COUNT, JPEG_QUALITY, RGBA_CHANNEL_COUNT};
use crate::error::{BandforgeError, Result};
use crate::pipeline::{Product, ProductSink};
use crate::raster::{BandArray, QuantizedImage};

/// File extension for a product: JPEG for gray/RGB, PNG for RGBA.
pub fn product_extension(image: &QuantizedImage) -> &'static str {
    match image.channels() {
        RGBA_CHANNEL_COUNT => "png",
        _ => "jpg",
    }
}

/// Save a 1- or 3-channel image as JPEG.
pub fn save_jpeg(image: &QuantizedImage, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
        match image.channels() {
            1 => encoder.encode_image(&as_gray(image)?)?,
            COLOR_CHANNEL_COUNT => encoder.encode_image(&as_rgb(image)?)?,
            n => return Err(BandforgeError::UnsupportedChannelCount(n)),
        }
    }
    writer.flush()?;
    Ok(())
}

/// Save an image as PNG (lossless; the only format used for RGBA).
pub fn save_png(image: &QuantizedImage, path: &Path) -> Result<()> {
    match image.channels() {
        1 => as_gray(image)?.save_with_format(path, ImageFormat::Png)?,
        COLOR_CHANNEL_COUNT => as_rgb(image)?.save_with_format(path, ImageFormat::Png)?,
        RGBA_CHANNEL_COUNT => as_rgba(image)?.save_with_format(path, ImageFormat::Png)?,
        n => return Err(BandforgeError::UnsupportedChannelCount(n)),
    }
    Ok(())
}

/// Save a product image, picking the encoder from its channel count.
pub fn save_product(image: &QuantizedImage, path: &Path) -> Result<()> {
    match image.channels() {
        RGBA_CHANNEL_COUNT => save_png(image, path),
        _ => save_jpeg(image, path),
    }
}

fn to_buffer<P: Pixel<Subpixel = u8>>(image: &QuantizedImage) -> Result<ImageBuffer<P, Vec<u8>>> {
    let (w, h) = (image.width(), image.height());
    let (width, height) = buffer_dims(w, h)?;
    ImageBuffer::from_raw(width, height, image.to_interleaved()).ok_or(
        BandforgeError::InvalidDimensions {
            width: w,
            height: h,
        },
    )
}

/// Image buffer dimensions; the encoders address pixels with `u32`.
fn buffer_dims(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(BandforgeError::InvalidDimensions { width, height }),
    }
}

fn as_gray(image: &QuantizedImage) -> Result<GrayImage> {
    to_buffer(image)
}

fn as_rgb(image: &QuantizedImage) -> Result<RgbImage> {
    to_buffer(image)
}

fn as_rgba(image: &QuantizedImage) -> Result<RgbaImage> {
    to_buffer(image)
}

/// Load a single-band image file as a band.
///
/// 8- and 16-bit samples keep their raw digital numbers; other single-channel
/// layouts are read as float. Multi-channel files are rejected rather than
/// collapsed, since a color conversion would fabricate band values.
pub fn load_band(path: &Path) -> Result<BandArray> {
    let img = image::open(path)?;
    let (w, h) = (img.width(), img.height());

    match img {
        DynamicImage::ImageLuma8(buf) => samples_to_band(w, h, buf.as_raw()),
        DynamicImage::ImageLuma16(buf) => samples_to_band(w, h, buf.as_raw()),
        other if other.color().channel_count() == 1 => {
            samples_to_band(w, h, other.to_luma32f().as_raw())
        }
        other => Err(BandforgeError::Decode(format!(
            "{} has {} channels, expected a single band",
            path.display(),
            other.color().channel_count()
        ))),
    }
}

/// Lift raw samples (row-major) into an f32 band.
pub fn samples_to_band<T: AsPrimitive<f32>>(
    width: u32,
    height: u32,
    samples: &[T],
) -> Result<BandArray> {
    let data: Vec<f32> = samples.iter().map(|s| s.as_()).collect();
    Ok(Array2::from_shape_vec((height as usize, width as usize), data)?)
}

/// Writes products into a directory as `<file_id>_<product>.<ext>`.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create the directory (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn product_path(&self, file_id: &str, product: &Product) -> PathBuf {
        self.dir.join(format!(
            "{file_id}_{}.{}",
            product.name,
            product_extension(&product.image)
        ))
    }
}

impl ProductSink for DirectorySink {
    fn write(&mut self, file_id: &str, product: &Product) -> Result<()> {
        let path = self.product_path(file_id, product);
        save_product(&product.image, &path)?;
        info!(path = %path.display(), channels = product.image.channels(), "Saved product");
        Ok(())
    }
}
