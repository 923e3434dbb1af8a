use crate::photo::{PHOTO_PALETTE_BASE, PHOTO_PALETTE_LEN};

/// Fine level: top 4 bits of each channel, 4096 nodes.
pub const FINE_NODES: usize = 1 << 12;
/// Coarse level: top 2 bits of each channel, 64 nodes.
pub const COARSE_NODES: usize = 1 << 6;
/// Fine nodes kept verbatim in the palette. The rest fold into their coarse node.
pub const FINE_NODES_USED: usize = 128;

/// One bucket of the flat node table. Sums are kept at source precision
/// (5-bit red, 6-bit green, 5-bit blue) and only averaged at the end.
#[derive(Clone, Copy, Default)]
struct Node {
    red_sum: u64,
    green_sum: u64,
    blue_sum: u64,
    pixels: u32,
}

impl Node {
    fn fold(&mut self, other: &Node) {
        self.red_sum += other.red_sum;
        self.green_sum += other.green_sum;
        self.blue_sum += other.blue_sum;
        self.pixels += other.pixels;
    }

    /// Integer-average color, requantized to 6-bit DAC channels. A node
    /// nobody mapped to averages to black rather than dividing by zero.
    fn average(&self) -> [u8; 3] {
        if self.pixels == 0 {
            return [0; 3];
        }
        let n = self.pixels as u64;
        [
            ((self.red_sum / n) as u8 & 0x1F) << 1,
            (self.green_sum / n) as u8 & 0x3F,
            ((self.blue_sum / n) as u8 & 0x1F) << 1,
        ]
    }
}

/// Fine node index of a 5:6:5 pixel: top 4 bits of each channel, 12-bit key.
pub fn fine_index(pixel: u16) -> usize {
    (((pixel >> 12) << 8) | (((pixel >> 7) & 0x0F) << 4) | ((pixel >> 1) & 0x0F)) as usize
}

/// Coarse node index of a 5:6:5 pixel: top 2 bits of each channel, 6-bit key.
pub fn coarse_index(pixel: u16) -> usize {
    (((pixel >> 14) << 4) | (((pixel >> 9) & 0x03) << 2) | ((pixel >> 3) & 0x03)) as usize
}

/// Reduces a 5:6:5 pixel stream to a 192-color palette and one palette index
/// per pixel. The first 128 entries are the most populous fine nodes taken
/// verbatim, the last 64 are the coarse nodes everything else folded into.
/// Output indices are offset by `PHOTO_PALETTE_BASE`; the reserved low range
/// is never written.
pub fn quantize(pixels: &[u16]) -> ([[u8; 3]; PHOTO_PALETTE_LEN], Vec<u8>) {
    let mut fine = [Node::default(); FINE_NODES];
    let mut coarse = [Node::default(); COARSE_NODES];

    for &pixel in pixels {
        let node = &mut fine[fine_index(pixel)];
        node.pixels += 1;
        node.red_sum += ((pixel >> 11) & 0x1F) as u64;
        node.green_sum += ((pixel >> 5) & 0x3F) as u64;
        node.blue_sum += (pixel & 0x1F) as u64;
    }

    // Descending pixel count; equal counts break toward the lower key so the
    // result is a pure function of the pixel stream.
    let mut order: Vec<u16> = (0..FINE_NODES as u16).collect();
    order.sort_by(|&a, &b| {
        fine[b as usize]
            .pixels
            .cmp(&fine[a as usize].pixels)
            .then(a.cmp(&b))
    });

    let mut palette = [[0u8; 3]; PHOTO_PALETTE_LEN];
    // fine key -> final palette slot, total over all 4096 keys
    let mut remap = [0u8; FINE_NODES];

    for (slot, &key) in order.iter().take(FINE_NODES_USED).enumerate() {
        palette[slot] = fine[key as usize].average();
        remap[key as usize] = slot as u8;
    }

    for &key in order.iter().skip(FINE_NODES_USED) {
        // Rebuild the coarse key from the fine one: top 2 of each 4-bit group.
        let key = key as usize;
        let coarse_key = (((key >> 10) & 0x03) << 4) | (((key >> 6) & 0x03) << 2) | ((key >> 2) & 0x03);
        coarse[coarse_key].fold(&fine[key]);
        remap[key] = (FINE_NODES_USED + coarse_key) as u8;
    }

    for (slot, node) in coarse.iter().enumerate() {
        palette[FINE_NODES_USED + slot] = node.average();
    }

    let img = pixels
        .iter()
        .map(|&pixel| PHOTO_PALETTE_BASE + remap[fine_index(pixel)])
        .collect();

    (palette, img)
}
