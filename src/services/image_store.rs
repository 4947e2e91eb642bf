use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use intensity_quant::{PixelImage, QuantLevel};

use crate::error::BenchError;

/// A decoded input image in B,G,R channel order.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    /// File name used in progress output
    pub name: String,
    pub image: PixelImage,
}

/// Reads inputs and writes quantized outputs through the `image` codecs.
///
/// Pixels are held as B,G,R in memory so palette entries keep the on-disk
/// colors they were defined for; the reorder happens at the codec boundary.
#[derive(Debug, Clone, Copy)]
pub struct ImageStore {
    jpeg_quality: u8,
}

impl ImageStore {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }

    /// Decode an image file off the async runtime.
    pub async fn load(&self, path: &Path) -> Result<LoadedImage, BenchError> {
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || decode(&owned))
            .await
            .map_err(|e| BenchError::Input {
                path: path.to_path_buf(),
                reason: format!("Decode task failed: {e}"),
            })?
    }

    /// Encode `image` to `path`, choosing the format from the extension.
    pub async fn save(&self, image: &PixelImage, path: &Path) -> Result<(), BenchError> {
        let image = image.clone();
        let owned = path.to_path_buf();
        let quality = self.jpeg_quality;
        tokio::task::spawn_blocking(move || encode(image, &owned, quality))
            .await
            .map_err(|e| BenchError::Output {
                path: path.to_path_buf(),
                reason: format!("Encode task failed: {e}"),
            })?
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new(95)
    }
}

fn decode(path: &Path) -> Result<LoadedImage, BenchError> {
    let input_error = |reason: String| BenchError::Input {
        path: path.to_path_buf(),
        reason,
    };

    let rgb = image::open(path)
        .map_err(|e| input_error(e.to_string()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut image = PixelImage::from_raw(width as usize, height as usize, rgb.into_raw())
        .map_err(|e| input_error(e.to_string()))?;
    image.reverse_channels();

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(path = %path.display(), width, height, "Loaded image");
    Ok(LoadedImage {
        path: path.to_path_buf(),
        name,
        image,
    })
}

fn encode(mut image: PixelImage, path: &Path, jpeg_quality: u8) -> Result<(), BenchError> {
    let output_error = |reason: String| BenchError::Output {
        path: path.to_path_buf(),
        reason,
    };

    image.reverse_channels();
    let (width, height) = (image.width() as u32, image.height() as u32);
    let rgb = RgbImage::from_raw(width, height, image.into_raw())
        .ok_or_else(|| output_error("pixel buffer does not match dimensions".to_string()))?;

    let format = ImageFormat::from_path(path).map_err(|e| output_error(e.to_string()))?;
    match format {
        ImageFormat::Jpeg => {
            let file = File::create(path).map_err(|e| output_error(e.to_string()))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), jpeg_quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| output_error(e.to_string()))?;
        }
        other => {
            rgb.save_with_format(path, other)
                .map_err(|e| output_error(e.to_string()))?;
        }
    }

    tracing::debug!(path = %path.display(), "Saved image");
    Ok(())
}

/// Where the quantized version of `input` is written.
///
/// `quantized_{stem}_k{K}.{ext}`, with `_r{run}` before the extension when
/// `run` is given.
pub fn output_path(output_dir: &Path, input: &Path, level: QuantLevel, run: Option<u32>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());

    let file_name = match run {
        Some(run) => format!("quantized_{stem}_k{level}_r{run}.{ext}"),
        None => format!("quantized_{stem}_k{level}.{ext}"),
    };
    output_dir.join(file_name)
}
