use crate::core::color::linear_to_srgb;
use crate::core::framebuffer::FrameBuffer;
use crate::error::Result;
use image::{Rgb, RgbImage};
use log::info;
use nalgebra::Vector3;
use std::path::{Path, PathBuf};

/// Resolves the frame buffer and writes it as an 8-bit RGB image. The format
/// follows the file extension.
pub fn save_framebuffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P, gamma: bool) -> Result<()> {
    let path = path.as_ref();
    let image = to_image(framebuffer, gamma);
    image.save(path)?;
    info!("Saved {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}

pub fn to_image(framebuffer: &FrameBuffer, gamma: bool) -> RgbImage {
    RgbImage::from_fn(framebuffer.width as u32, framebuffer.height as u32, |x, y| {
        let color = framebuffer
            .get_pixel(x as usize, y as usize)
            .unwrap_or_else(Vector3::zeros);
        let color = if gamma { linear_to_srgb(color) } else { color };
        Rgb(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8).into())
    })
}

/// `out.png` stays as is for a single frame; frame 3 of many becomes `out_0003.png`.
pub fn frame_path(base: &Path, frame: usize, frames: usize) -> PathBuf {
    if frames <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let name = match base.extension() {
        Some(ext) => format!("{stem}_{frame:04}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{frame:04}"),
    };
    base.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_numbers_only_for_sequences() {
        let base = Path::new("renders/out.png");
        assert_eq!(frame_path(base, 1, 1), PathBuf::from("renders/out.png"));
        assert_eq!(frame_path(base, 3, 10), PathBuf::from("renders/out_0003.png"));
    }

    #[test]
    fn colors_quantize_to_bytes() {
        let mut fb = FrameBuffer::new(2, 1, 1);
        fb.clear(Vector3::new(1.0, 0.5, 0.0));
        fb.set_pixel(1, 0, Vector3::new(2.0, -1.0, 0.25));
        let image = to_image(&fb, false);
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 128, 0]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([255, 0, 64]));
    }
}
