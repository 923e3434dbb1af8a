use super::*;
use crate::photo::octree::{coarse_index, fine_index, quantize, FINE_NODES_USED};

/// Builds a photo file image: header plus pixels already in file order
/// (bottom row first).
fn photo_file(width: u16, height: u16, pixels: &[u16]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + pixels.len() * 2);
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    for pixel in pixels {
        data.extend_from_slice(&pixel.to_le_bytes());
    }
    data
}

fn image_file(width: u16, height: u16, pixels: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + pixels.len());
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(pixels);
    data
}

#[test]
fn test_uniform_photo_single_bucket() {
    // 500 identical pixels: one fine bucket with count 500, selected into
    // slot 0, every pixel remapped to the same index.
    let pixel = 0xABCD_u16;
    let pixels = vec![pixel; 500];
    let (palette, img) = quantize(&pixels);

    let r = (pixel >> 11) & 0x1F;
    let g = (pixel >> 5) & 0x3F;
    let b = pixel & 0x1F;
    assert_eq!(palette[0], [(r as u8) << 1, g as u8, (b as u8) << 1]);
    assert!(img.iter().all(|&i| i == PHOTO_PALETTE_BASE));
}

#[test]
fn test_uniform_photo_end_to_end() {
    let file = photo_file(20, 25, &vec![0xABCD; 500]);
    let photo = Photo::parse(&file).unwrap();
    assert_eq!(photo.width(), 20);
    assert_eq!(photo.height(), 25);
    assert!(photo.img().iter().all(|&i| i == PHOTO_PALETTE_BASE));
    assert_eq!(photo.palette()[0], [21 << 1, 30, 13 << 1]);
}

#[test]
fn test_quantize_empty_stream_all_zero() {
    let (palette, img) = quantize(&[]);
    assert!(img.is_empty());
    assert!(palette.iter().all(|&c| c == [0, 0, 0]));
}

#[test]
fn test_quantize_idempotent() {
    let pixels: Vec<u16> = (0..10_000u32).map(|i| (i.wrapping_mul(2654435761) >> 16) as u16).collect();
    let first = quantize(&pixels);
    let second = quantize(&pixels);
    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}

#[test]
fn test_remap_is_total_and_in_range() {
    let pixels: Vec<u16> = (0..=u16::MAX).step_by(7).collect();
    let (palette, img) = quantize(&pixels);
    assert_eq!(img.len(), pixels.len());
    assert!(img.iter().all(|&i| i >= PHOTO_PALETTE_BASE));
    // 6-bit DAC channels only
    assert!(palette.iter().flatten().all(|&c| c < 64));
}

#[test]
fn test_tie_break_by_ascending_key() {
    // Equal counts: the lower fine key takes the lower palette slot.
    let pixels = [0xFFFF_u16, 0x0000];
    assert!(fine_index(pixels[1]) < fine_index(pixels[0]));
    let (_, img) = quantize(&pixels);
    assert_eq!(img[0], PHOTO_PALETTE_BASE + 1);
    assert_eq!(img[1], PHOTO_PALETTE_BASE);
}

#[test]
fn test_overflow_buckets_fold_into_coarse() {
    // 128 popular colors (distinct fine buckets, two pixels each) take all
    // fine slots; two rare blues fold into their shared coarse bucket.
    let mut pixels = Vec::new();
    for i in 0..128u16 {
        let popular = ((i >> 4) << 12) | ((i & 0x0F) << 7);
        pixels.push(popular);
        pixels.push(popular);
    }
    pixels.push(0x001E); // blue 30
    pixels.push(0x001C); // blue 28

    let (palette, img) = quantize(&pixels);

    // Both rare pixels land in coarse bucket 3 (blue top bits 11).
    assert_eq!(coarse_index(0x001E), 3);
    let coarse_slot = (FINE_NODES_USED + coarse_index(0x001E)) as u8;
    assert_eq!(img[256], PHOTO_PALETTE_BASE + coarse_slot);
    assert_eq!(img[257], PHOTO_PALETTE_BASE + coarse_slot);
    // Coarse average of the folded sums: (30 + 28) / 2, requantized.
    assert_eq!(palette[coarse_slot as usize], [0, 0, 29 << 1]);
}

#[test]
fn test_photo_rows_reversed_to_top_first() {
    // One column, two rows. The file stores the bottom row first, so the
    // second file pixel is the top of the image.
    let bottom = 0x0000_u16;
    let top = 0xFFFF_u16;
    let photo = Photo::parse(&photo_file(1, 2, &[bottom, top])).unwrap();
    // Lower fine key (bottom pixel) holds palette slot 0.
    assert_eq!(photo.img(), [PHOTO_PALETTE_BASE + 1, PHOTO_PALETTE_BASE]);
}

#[test]
fn test_photo_rejects_oversized_dimensions() {
    let file = photo_file(MAX_PHOTO_WIDTH as u16 + 1, 1, &[]);
    assert!(matches!(
        Photo::parse(&file),
        Err(PhotoError::TooLarge { width, height: 1 }) if width == MAX_PHOTO_WIDTH as u16 + 1
    ));
}

#[test]
fn test_photo_rejects_truncated_pixels() {
    let mut file = photo_file(4, 4, &[0x1234; 16]);
    file.truncate(file.len() - 3);
    assert!(matches!(Photo::parse(&file), Err(PhotoError::Truncated)));
    assert!(matches!(Photo::parse(&[0x02]), Err(PhotoError::Truncated)));
}

#[test]
fn test_image_rows_reversed_verbatim_pixels() {
    // 2x2 sprite, bottom row [1, 2] first in the file. Pixels are stored
    // untouched, transparency sentinel included.
    let file = image_file(2, 2, &[1, 2, 3, OBJ_CLR_TRANSP]);
    let image = Image::parse(&file).unwrap();
    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 2);
    assert_eq!(image.img(), [3, OBJ_CLR_TRANSP, 1, 2]);
}

#[test]
fn test_image_rejects_oversized_and_truncated() {
    let file = image_file(1, MAX_OBJECT_HEIGHT as u16 + 1, &[]);
    assert!(matches!(Image::parse(&file), Err(PhotoError::TooLarge { .. })));

    let file = image_file(3, 3, &[0; 8]);
    assert!(matches!(Image::parse(&file), Err(PhotoError::Truncated)));
}
