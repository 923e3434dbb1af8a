use std::rc::Rc;

use crate::photo::{Image, Photo};

/// A sprite placed in a room at map-pixel coordinates.
pub struct Object {
    x: i32,
    y: i32,
    image: Rc<Image>,
}

impl Object {
    pub fn new(x: i32, y: i32, image: Rc<Image>) -> Self {
        Self { x, y, image }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn image(&self) -> &Image {
        &self.image
    }
}

/// A room: its quantized photo plus the objects placed in it. Objects draw
/// in insertion order, so later placements cover earlier ones.
pub struct Room {
    photo: Photo,
    objects: Vec<Object>,
}

impl Room {
    pub fn new(photo: Photo) -> Self {
        Self { photo, objects: Vec::new() }
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }
}
