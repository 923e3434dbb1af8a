use std::path::Path;

use thiserror::Error;

use crate::photo::octree::quantize;

pub mod octree;

#[cfg(test)]
mod test;

pub const MAX_PHOTO_WIDTH: usize = 1024;
pub const MAX_PHOTO_HEIGHT: usize = 1024;
pub const MAX_OBJECT_WIDTH: usize = 160;
pub const MAX_OBJECT_HEIGHT: usize = 100;

/// Sprite pixel value that the compositor never draws.
pub const OBJ_CLR_TRANSP: u8 = 0x40;

/// First palette index the quantizer may hand out. Indices below this belong
/// to the fixed low palette (2:2:2 sprite and UI colors).
pub const PHOTO_PALETTE_BASE: u8 = 64;
/// Photo palette entries: 128 fine octree nodes plus 64 coarse ones.
pub const PHOTO_PALETTE_LEN: usize = 192;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("declared dimensions {width}x{height} exceed the maximum")]
    TooLarge { width: u16, height: u16 },
    #[error("pixel data truncated")]
    Truncated,
}

/// A room photo, quantized at load time. Pixels are one palette index per
/// byte, top row first, no padding.
pub struct Photo {
    width: u16,
    height: u16,
    palette: [[u8; 3]; PHOTO_PALETTE_LEN],
    img: Vec<u8>,
}

/// An object image, stored exactly as read: 2:2:2 color codes with
/// `OBJ_CLR_TRANSP` marking holes. Top row first, no padding.
pub struct Image {
    width: u16,
    height: u16,
    img: Vec<u8>,
}

/// Reads the common `{width: u16, height: u16}` header and checks the
/// declared size before any pixel data is touched.
fn parse_header(
    data: &[u8],
    max_width: usize,
    max_height: usize,
) -> Result<(u16, u16), PhotoError> {
    if data.len() < 4 {
        return Err(PhotoError::Truncated);
    }
    let width = u16::from_le_bytes([data[0], data[1]]);
    let height = u16::from_le_bytes([data[2], data[3]]);
    if width as usize > max_width || height as usize > max_height {
        return Err(PhotoError::TooLarge { width, height });
    }
    Ok((width, height))
}

impl Photo {
    /// Reads a 5:6:5 photo file and quantizes it to the photo palette.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, PhotoError> {
        Self::parse(&std::fs::read(path)?)
    }

    /// Parses header and pixels from an in-memory photo file, then runs the
    /// octree quantizer. Files store rows bottom to top; memory holds them
    /// top to bottom.
    pub fn parse(data: &[u8]) -> Result<Self, PhotoError> {
        let (width, height) = parse_header(data, MAX_PHOTO_WIDTH, MAX_PHOTO_HEIGHT)?;
        let (w, h) = (width as usize, height as usize);
        let body = &data[4..];
        if body.len() < w * h * 2 {
            return Err(PhotoError::Truncated);
        }

        let mut pixels = vec![0u16; w * h];
        for y in 0..h {
            let row = &body[(h - 1 - y) * w * 2..];
            for x in 0..w {
                pixels[y * w + x] = u16::from_le_bytes([row[x * 2], row[x * 2 + 1]]);
            }
        }

        let (palette, img) = quantize(&pixels);
        Ok(Self { width, height, palette, img })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn palette(&self) -> &[[u8; 3]; PHOTO_PALETTE_LEN] {
        &self.palette
    }

    pub fn img(&self) -> &[u8] {
        &self.img
    }

    #[cfg(test)]
    pub(crate) fn test_build(width: u16, height: u16, img: Vec<u8>) -> Self {
        Self { width, height, palette: [[0; 3]; PHOTO_PALETTE_LEN], img }
    }
}

impl Image {
    /// Reads a 2:2:2 object image file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, PhotoError> {
        Self::parse(&std::fs::read(path)?)
    }

    pub fn parse(data: &[u8]) -> Result<Self, PhotoError> {
        let (width, height) = parse_header(data, MAX_OBJECT_WIDTH, MAX_OBJECT_HEIGHT)?;
        let (w, h) = (width as usize, height as usize);
        let body = &data[4..];
        if body.len() < w * h {
            return Err(PhotoError::Truncated);
        }

        let mut img = vec![0u8; w * h];
        for y in 0..h {
            img[y * w..(y + 1) * w].copy_from_slice(&body[(h - 1 - y) * w..(h - y) * w]);
        }

        Ok(Self { width, height, img })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn img(&self) -> &[u8] {
        &self.img
    }

    #[cfg(test)]
    pub(crate) fn test_build(width: u16, height: u16, img: Vec<u8>) -> Self {
        Self { width, height, img }
    }
}
