use bitflags::bitflags;

bitflags! {
    /// Scroll keys currently held. Opposite directions cancel out.
    #[derive(Copy, Clone, Debug, Default)]
    pub struct ScrollKeys: u8 {
        const Up    = 0x01;
        const Down  = 0x02;
        const Left  = 0x04;
        const Right = 0x08;
    }
}

impl ScrollKeys {
    pub fn set_key(&mut self, key: ScrollKeys, pressed: bool) {
        self.set(key, pressed);
    }

    /// Per-frame view-origin delta in map pixels.
    pub fn delta(&self, step: i32) -> (i32, i32) {
        let mut dx = 0;
        let mut dy = 0;
        if self.contains(ScrollKeys::Left) {
            dx -= step;
        }
        if self.contains(ScrollKeys::Right) {
            dx += step;
        }
        if self.contains(ScrollKeys::Up) {
            dy -= step;
        }
        if self.contains(ScrollKeys::Down) {
            dy += step;
        }
        (dx, dy)
    }
}
