use std::{collections::HashMap, env, rc::Rc};

use display::{PaletteWriter, View, SCROLL_X_DIM, SCROLL_Y_DIM};
use input::ScrollKeys;
use mimalloc::MiMalloc;
use once_cell::sync::Lazy;
use photo::{Image, Photo, PHOTO_PALETTE_BASE, PHOTO_PALETTE_LEN};
use sdl2::{event::Event, keyboard::Keycode, pixels::PixelFormatEnum};
use world::{Object, Room};

pub mod display;
pub mod input;
pub mod photo;
pub mod world;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// The reserved low palette: the 64 2:2:2 colors object images index into,
/// expanded to 6-bit DAC channels.
static BASE_PALETTE: Lazy<[[u8; 3]; PHOTO_PALETTE_BASE as usize]> = Lazy::new(|| {
    std::array::from_fn(|i| {
        let i = i as u8;
        [((i >> 4) & 0x03) * 21, ((i >> 2) & 0x03) * 21, (i & 0x03) * 21]
    })
});

/// Software stand-in for the palette registers: 256 6-bit DAC triples, the
/// low 64 fixed, the rest reprogrammed on every room transition.
struct Palette {
    colors: [[u8; 3]; 256],
}

impl Palette {
    fn new() -> Self {
        let mut colors = [[0u8; 3]; 256];
        colors[..PHOTO_PALETTE_BASE as usize].copy_from_slice(&*BASE_PALETTE);
        Self { colors }
    }

    /// 8-bit RGB for one composed pixel.
    fn rgb(&self, index: u8) -> [u8; 3] {
        let [r, g, b] = self.colors[index as usize];
        [r << 2, g << 2, b << 2]
    }
}

impl PaletteWriter for Palette {
    fn write_photo_palette(&mut self, palette: &[[u8; 3]; PHOTO_PALETTE_LEN]) {
        self.colors[PHOTO_PALETTE_BASE as usize..].copy_from_slice(palette);
    }
}

fn main() -> Result<(), String> {
    let args: Vec<_> = env::args().collect();
    let Some(photo_path) = args.get(1) else {
        return Err(format!("usage: {} photo.img [sprite.img:x:y ...]", args[0]));
    };

    let photo = Photo::read(photo_path).map_err(|e| e.to_string())?;
    let mut room = Room::new(photo);
    for placement in &args[2..] {
        room.add_object(parse_placement(placement)?);
    }

    let mut palette = Palette::new();
    let view = View::new(Rc::new(room), &mut palette);

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let window = video_subsystem
        .window("roomview", SCROLL_X_DIM as u32 * 3, SCROLL_Y_DIM as u32 * 3)
        .position_centered()
        .build().map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().present_vsync().build().map_err(|e| e.to_string())?;
    let creator = canvas.texture_creator();
    let mut texture = creator
        .create_texture_streaming(PixelFormatEnum::RGB24, SCROLL_X_DIM as u32, SCROLL_Y_DIM as u32)
        .map_err(|e| e.to_string())?;
    let mut event_pump = sdl_context.event_pump()?;

    let mut key_map = HashMap::new();
    key_map.insert(Keycode::Up, ScrollKeys::Up);
    key_map.insert(Keycode::Down, ScrollKeys::Down);
    key_map.insert(Keycode::Left, ScrollKeys::Left);
    key_map.insert(Keycode::Right, ScrollKeys::Right);
    key_map.insert(Keycode::W, ScrollKeys::Up);
    key_map.insert(Keycode::S, ScrollKeys::Down);
    key_map.insert(Keycode::A, ScrollKeys::Left);
    key_map.insert(Keycode::D, ScrollKeys::Right);

    let max_x = (view.room().photo().width() as i32 - SCROLL_X_DIM as i32).max(0);
    let max_y = (view.room().photo().height() as i32 - SCROLL_Y_DIM as i32).max(0);
    let mut keys = ScrollKeys::default();
    let (mut x, mut y) = (0i32, 0i32);

    let mut line = [0u8; SCROLL_X_DIM];
    let mut frame = vec![0u8; SCROLL_X_DIM * SCROLL_Y_DIM * 3];

    loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => {
                    return Ok(());
                }
                Event::KeyDown { keycode: Some(key), .. } => {
                    if let Some(&key) = key_map.get(&key) {
                        keys.set_key(key, true);
                    }
                }
                Event::KeyUp { keycode: Some(key), .. } => {
                    if let Some(&key) = key_map.get(&key) {
                        keys.set_key(key, false);
                    }
                }
                _ => {}
            }
        }

        let (dx, dy) = keys.delta(2);
        x = (x + dx).clamp(0, max_x);
        y = (y + dy).clamp(0, max_y);

        for row in 0..SCROLL_Y_DIM {
            view.fill_horiz_buffer(x, y + row as i32, &mut line);
            for (col, &index) in line.iter().enumerate() {
                let offset = (row * SCROLL_X_DIM + col) * 3;
                frame[offset..offset + 3].copy_from_slice(&palette.rgb(index));
            }
        }

        texture.update(None, &frame, SCROLL_X_DIM * 3).map_err(|e| e.to_string())?;
        canvas.copy(&texture, None, None)?;
        canvas.present();
    }
}

/// Parses a `sprite.img:x:y` command-line placement.
fn parse_placement(arg: &str) -> Result<Object, String> {
    let mut parts = arg.rsplitn(3, ':');
    let y = parts.next().and_then(|s| s.parse().ok());
    let x = parts.next().and_then(|s| s.parse().ok());
    let (Some(path), Some(x), Some(y)) = (parts.next(), x, y) else {
        return Err(format!("bad placement '{arg}', expected sprite.img:x:y"));
    };
    let image = Image::read(path).map_err(|e| e.to_string())?;
    Ok(Object::new(x, y, Rc::new(image)))
}
