use crate::device_display::interface::Status;
use crate::overlay::shape::Shape;
use image::RgbImage;

/// In-memory state of a display: the last video frame plus the overlay drawn on top.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub frame: Option<RgbImage>,
    pub frame_revision: u64,
    pub shapes: Vec<Shape>,
    pub status: Status,
}

impl Surface {
    /// Resizing to new dimensions drops the overlay, like resizing a canvas does.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.shapes.clear();
        }
    }

    pub fn show_frame(&mut self, frame: &RgbImage) {
        self.frame = Some(frame.clone());
        self.frame_revision += 1;
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn draw(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Copy of everything but the frame pixels.
    pub fn without_frame(&self) -> Surface {
        Surface {
            width: self.width,
            height: self.height,
            frame: None,
            frame_revision: self.frame_revision,
            shapes: self.shapes.clone(),
            status: self.status.clone(),
        }
    }

    pub fn rects(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Rect { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Text { .. }))
    }
}

/// Hands out `rx` once; later callers get a receiver whose sender is already gone.
pub fn take_receiver<T>(
    slot: &std::sync::Mutex<Option<std::sync::mpsc::Receiver<T>>>,
) -> std::sync::mpsc::Receiver<T> {
    slot.lock()
        .unwrap_or_else(|e| e.into_inner())
        .take()
        .unwrap_or_else(|| std::sync::mpsc::channel().1)
}
