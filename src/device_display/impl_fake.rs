use crate::device_display::interface::{DeviceDisplay, DisplayError, DisplayEvent, Status};
use crate::device_display::surface::{take_receiver, Surface};
use crate::overlay::shape::{Rect, Shape, StrokeStyle, TextStyle};
use image::RgbImage;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

pub struct DeviceDisplayFake {
    surface: Arc<Mutex<Surface>>,
    events_tx: mpsc::Sender<DisplayEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<DisplayEvent>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            surface: Arc::new(Mutex::new(Surface::default())),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Shared handle for inspecting what has been drawn.
    pub fn surface(&self) -> Arc<Mutex<Surface>> {
        self.surface.clone()
    }

    /// Simulates user input.
    pub fn sender(&self) -> mpsc::Sender<DisplayEvent> {
        self.events_tx.clone()
    }

    fn with_surface(&self, f: impl FnOnce(&mut Surface)) -> Result<(), DisplayError> {
        let mut surface = self
            .surface
            .lock()
            .map_err(|e| DisplayError(e.to_string()))?;
        f(&mut surface);
        Ok(())
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        self.with_surface(|s| s.resize(width, height))
    }

    fn show_frame(&mut self, frame: &RgbImage) -> Result<(), DisplayError> {
        self.with_surface(|s| s.show_frame(frame))
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.with_surface(Surface::clear)
    }

    fn stroke_rect(&mut self, rect: Rect, style: StrokeStyle) -> Result<(), DisplayError> {
        self.with_surface(|s| s.draw(Shape::Rect { rect, style }))
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        self.with_surface(|s| {
            s.draw(Shape::Text {
                text: text.to_string(),
                x,
                y,
                style,
            })
        })
    }

    fn set_status(&mut self, status: &Status) -> Result<(), DisplayError> {
        self.with_surface(|s| s.status = status.clone())
    }

    fn events(&self) -> mpsc::Receiver<DisplayEvent> {
        take_receiver(&self.events_rx)
    }
}
