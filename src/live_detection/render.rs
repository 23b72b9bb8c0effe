use super::main::LiveDetection;
use crate::device_display::interface::DisplayError;
use crate::live_detection::core::Model;
use crate::overlay::render::render_detections;

impl LiveDetection {
    /// Brings the display in line with the model: status line, then the overlay.
    pub fn render(&self, model: &Model) -> Result<(), DisplayError> {
        let mut display = self.display();

        display.set_status(&model.status())?;
        render_detections(&mut *display, &model.detections)?;

        Ok(())
    }
}
