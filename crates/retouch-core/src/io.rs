use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageError, ImageFormat, ImageReader};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::{EditError, Result};
use crate::raster::Raster;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff"];

pub fn is_supported_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

/// Decode the image at `path` into a [`Raster`].
///
/// The format is sniffed from the file contents, falling back to the
/// extension when the header is not recognised.
pub fn load_raster(path: &Path) -> Result<Raster> {
    if !path.is_file() {
        return Err(EditError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    info!(?path, "loading image file");
    let t0 = Instant::now();

    let decode_err = |source: ImageError| EditError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| decode_err(ImageError::IoError(err)))?
        .decode()
        .map_err(decode_err)?;

    debug!(
        elapsed_ms = t0.elapsed().as_millis(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "image decode"
    );

    Ok(Raster::from_dynamic(img))
}

/// Encode `raster` to `path`, picking the format from the extension.
///
/// The whole file is encoded in memory first. An existing file at `path`
/// is only replaced once encoding has succeeded, and missing parent
/// directories are created at that point.
pub fn save_raster(raster: &Raster, path: &Path, config: &SessionConfig) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|err| EditError::write(path, err))?;
    if !format.writing_enabled() {
        return Err(EditError::write(
            path,
            format!("no encoder available for {format:?}"),
        ));
    }
    if format == ImageFormat::Jpeg && raster.layout().has_alpha() {
        return Err(EditError::write(
            path,
            format!(
                "JPEG cannot store the alpha channel of a {:?} image",
                raster.layout()
            ),
        ));
    }

    let img = raster.to_dynamic().map_err(|err| EditError::write(path, err))?;
    let img = widen_for(format, img);

    let t0 = Instant::now();
    let mut bytes = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut bytes, config.jpeg_quality());
            img.write_with_encoder(encoder)
                .map_err(|err| EditError::write(path, err))?;
        }
        _ => img
            .write_to(&mut Cursor::new(&mut bytes), format)
            .map_err(|err| EditError::write(path, err))?,
    }
    debug!(
        elapsed_ms = t0.elapsed().as_millis(),
        bytes = bytes.len(),
        "image encode"
    );

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| EditError::write(path, err))?;
    }
    fs::write(path, &bytes).map_err(|err| EditError::write(path, err))?;

    info!(?path, ?format, width = raster.width(), height = raster.height(), "saved image");
    Ok(())
}

/// GIF has no gray palette mode and TIFF no gray+alpha, so those layouts
/// are stored as the colour layout that holds the same pixels.
fn widen_for(format: ImageFormat, img: DynamicImage) -> DynamicImage {
    match (format, img.color()) {
        (ImageFormat::Gif, ColorType::L8) => DynamicImage::ImageRgb8(img.to_rgb8()),
        (ImageFormat::Gif | ImageFormat::Tiff, ColorType::La8) => {
            debug!(?format, "widening gray+alpha to rgba");
            DynamicImage::ImageRgba8(img.to_rgba8())
        }
        _ => img,
    }
}
