use crate::device_display::interface::{DeviceDisplay, DisplayError, DisplayEvent, Status};
use crate::device_display::surface::Surface;
use crate::library::logger::interface::Logger;
use crate::overlay::shape::{Rect, Shape, StrokeStyle, TextStyle};
use image::RgbImage;
use std::io::BufRead;
use std::sync::{mpsc, Arc};

/// Headless display. Prints each overlay pass and reads toggles from stdin:
/// an empty line toggles streaming, `q` quits.
pub struct DeviceDisplayConsole {
    logger: Arc<dyn Logger + Send + Sync>,
    surface: Surface,
}

impl DeviceDisplayConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("display").with_namespace("console"),
            surface: Surface::default(),
        }
    }

    fn log(&self, message: &str) -> Result<(), DisplayError> {
        self.logger
            .info(message)
            .map_err(|e| DisplayError(e.to_string()))
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        if (self.surface.width, self.surface.height) != (width, height) {
            self.log(&format!("Surface resized to {}x{}", width, height))?;
        }
        self.surface.resize(width, height);
        Ok(())
    }

    fn show_frame(&mut self, _frame: &RgbImage) -> Result<(), DisplayError> {
        self.surface.frame_revision += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.surface.clear();
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, style: StrokeStyle) -> Result<(), DisplayError> {
        self.log(&format!(
            "rect ({:.0}, {:.0}) {:.0}x{:.0}",
            rect.x, rect.y, rect.width, rect.height
        ))?;
        self.surface.draw(Shape::Rect { rect, style });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        self.log(&format!("label \"{}\" at ({:.0}, {:.0})", text, x, y))?;
        self.surface.draw(Shape::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
        Ok(())
    }

    fn set_status(&mut self, status: &Status) -> Result<(), DisplayError> {
        if self.surface.status != *status {
            let state = if status.streaming { "streaming" } else { "idle" };
            match &status.error {
                Some(error) => self.log(&format!("[{}] {}", state, error))?,
                None => self.log(&format!("[{}]", state))?,
            }
            self.surface.status = status.clone();
        }
        Ok(())
    }

    fn events(&self) -> mpsc::Receiver<DisplayEvent> {
        let (tx, rx) = mpsc::channel();
        let _ = self
            .logger
            .info("Press Enter to start/stop the camera, q to quit");

        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let event = match line.trim() {
                    "q" | "quit" => DisplayEvent::Closed,
                    _ => DisplayEvent::ToggleStreaming,
                };
                if tx.send(event).is_err() || event == DisplayEvent::Closed {
                    break;
                }
            }
        });

        rx
    }
}
