use std::rc::Rc;

use crate::photo::PHOTO_PALETTE_LEN;
use crate::world::Room;


/// Length of a horizontal scanline in pixels.
pub const SCROLL_X_DIM: usize = 320;
/// Length of a vertical scanline in pixels.
pub const SCROLL_Y_DIM: usize = 182;

/// Display-backend seam: whoever owns the palette hardware (or its software
/// stand-in) accepts the photo palette here when a room becomes current.
pub trait PaletteWriter {
    fn write_photo_palette(&mut self, palette: &[[u8; 3]; PHOTO_PALETTE_LEN]);
}

/// The room currently on screen. The scroll loop holds one of these and
/// asks it for scanlines; nothing else reads the active room.
pub struct View {
    room: Rc<Room>,
}

impl View {
    pub fn new(room: Rc<Room>, dac: &mut impl PaletteWriter) -> Self {
        dac.write_photo_palette(room.photo().palette());
        Self { room }
    }

    /// Makes `room` current and pushes its palette to the display backend.
    /// Must not race a fill call; the caller transitions rooms between frames.
    pub fn prep_room(&mut self, room: Rc<Room>, dac: &mut impl PaletteWriter) {
        dac.write_photo_palette(room.photo().palette());
        self.room = room;
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Renders the horizontal line whose leftmost map pixel is (x, y): photo
    /// first, then every object crossing the line. Map coordinates outside
    /// the photo come out as index 0.
    pub fn fill_horiz_buffer(&self, x: i32, y: i32, buf: &mut [u8; SCROLL_X_DIM]) {
        let photo = self.room.photo();
        let (w, h) = (photo.width() as i32, photo.height() as i32);

        for (idx, out) in buf.iter_mut().enumerate() {
            let px = x + idx as i32;
            *out = if (0..w).contains(&px) && (0..h).contains(&y) {
                photo.img()[(w * y + px) as usize]
            } else {
                0
            };
        }

        for obj in self.room.objects() {
            let img = obj.image();
            let (obj_w, obj_h) = (img.width() as i32, img.height() as i32);
            let (obj_x, obj_y) = (obj.x(), obj.y());

            if y < obj_y || y >= obj_y + obj_h
                || x + SCROLL_X_DIM as i32 <= obj_x || x >= obj_x + obj_w
            {
                continue;
            }

            // The y offset into the image is fixed; x depends on whether the
            // object starts before or after the line does.
            let yoff = (y - obj_y) * obj_w;
            let (mut idx, mut imgx) = if x <= obj_x {
                (obj_x - x, 0)
            } else {
                (0, x - obj_x)
            };

            while idx < SCROLL_X_DIM as i32 && imgx < obj_w {
                let pixel = img.img()[(yoff + imgx) as usize];
                if pixel != crate::photo::OBJ_CLR_TRANSP {
                    buf[idx as usize] = pixel;
                }
                idx += 1;
                imgx += 1;
            }
        }
    }

    /// Renders the vertical line whose top map pixel is (x, y). Same rules
    /// as `fill_horiz_buffer`.
    pub fn fill_vert_buffer(&self, x: i32, y: i32, buf: &mut [u8; SCROLL_Y_DIM]) {
        let photo = self.room.photo();
        let (w, h) = (photo.width() as i32, photo.height() as i32);

        for (idx, out) in buf.iter_mut().enumerate() {
            let py = y + idx as i32;
            *out = if (0..w).contains(&x) && (0..h).contains(&py) {
                photo.img()[(w * py + x) as usize]
            } else {
                0
            };
        }

        for obj in self.room.objects() {
            let img = obj.image();
            let (obj_w, obj_h) = (img.width() as i32, img.height() as i32);
            let (obj_x, obj_y) = (obj.x(), obj.y());

            if x < obj_x || x >= obj_x + obj_w
                || y + SCROLL_Y_DIM as i32 <= obj_y || y >= obj_y + obj_h
            {
                continue;
            }

            let xoff = x - obj_x;
            let (mut idx, mut imgy) = if y <= obj_y {
                (obj_y - y, 0)
            } else {
                (0, y - obj_y)
            };

            while idx < SCROLL_Y_DIM as i32 && imgy < obj_h {
                let pixel = img.img()[(xoff + obj_w * imgy) as usize];
                if pixel != crate::photo::OBJ_CLR_TRANSP {
                    buf[idx as usize] = pixel;
                }
                idx += 1;
                imgy += 1;
            }
        }
    }
}
