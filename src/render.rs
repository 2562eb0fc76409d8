use std::io::Cursor;
use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use thiserror::Error;
use tracing::info;

use crate::field::Field;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("a {rows}x{cols} field at {cell_size}px per cell does not fit in an image")]
    TooLarge {
        rows: usize,
        cols: usize,
        cell_size: u32,
    },
    #[error("failed to encode or write image")]
    Image(#[from] image::ImageError),
}

/// Rasterises the field with one `cell_size` square per cell, coloured by the
/// cell's last strategy transition.
pub fn render_field(field: &Field, cell_size: u32) -> Result<RgbImage, RenderError> {
    let too_large = || RenderError::TooLarge {
        rows: field.rows(),
        cols: field.cols(),
        cell_size,
    };
    let width = u32::try_from(field.cols())
        .ok()
        .and_then(|cols| cols.checked_mul(cell_size))
        .ok_or_else(too_large)?;
    let height = u32::try_from(field.rows())
        .ok()
        .and_then(|rows| rows.checked_mul(cell_size))
        .ok_or_else(too_large)?;

    let mut image: RgbImage = ImageBuffer::new(width, height);
    for (row, col, cell) in field.iter() {
        let color = Rgb(cell.transition().rgb());
        let x0 = col as u32 * cell_size;
        let y0 = row as u32 * cell_size;
        for y in y0..y0 + cell_size {
            for x in x0..x0 + cell_size {
                image.put_pixel(x, y, color);
            }
        }
    }
    Ok(image)
}

pub fn render_png(field: &Field, cell_size: u32) -> Result<Vec<u8>, RenderError> {
    let image = render_field(field, cell_size)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn save_png(field: &Field, cell_size: u32, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let image = render_field(field, cell_size)?;
    image.save_with_format(path, ImageFormat::Png)?;
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "wrote field image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::evolve;

    #[test]
    fn image_size_follows_cell_size() {
        let field: Field = "2 3\nCCD\nDCC\n".parse().unwrap();
        let image = render_field(&field, 5).unwrap();
        assert_eq!(image.dimensions(), (15, 10));
    }

    #[test]
    fn colors_follow_transitions() {
        let field = evolve("2 2\nCD\nDC\n".parse().unwrap(), 1, 3.0);
        let image = render_field(&field, 4).unwrap();
        // (0,0) went C -> D, (0,1) stayed D.
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 255, 0]));
        assert_eq!(image.get_pixel(3, 3), &Rgb([255, 255, 0]));
        assert_eq!(image.get_pixel(4, 0), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(7, 7), &Rgb([255, 255, 0]));
    }

    #[test]
    fn unstepped_field_is_drawn_stable() {
        let field: Field = "1 2\nCD\n".parse().unwrap();
        let image = render_field(&field, 1).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn png_bytes_have_signature() {
        let field: Field = "1 1\nC\n".parse().unwrap();
        let bytes = render_png(&field, 5).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
