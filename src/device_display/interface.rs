use crate::overlay::shape::{Rect, StrokeStyle, TextStyle};
use image::RgbImage;
use std::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("display error: {0}")]
pub struct DisplayError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    ToggleStreaming,
    Closed,
}

/// What the status line shows next to the toggle control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub streaming: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// A live video view with a paintable overlay sized to the video frame.
pub trait DeviceDisplay: Send + Sync {
    /// Match the surface to the frame's pixel dimensions.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError>;

    /// Copy a video frame onto the surface.
    fn show_frame(&mut self, frame: &RgbImage) -> Result<(), DisplayError>;

    /// Remove everything drawn on the overlay.
    fn clear(&mut self) -> Result<(), DisplayError>;

    fn stroke_rect(&mut self, rect: Rect, style: StrokeStyle) -> Result<(), DisplayError>;

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle)
        -> Result<(), DisplayError>;

    fn set_status(&mut self, status: &Status) -> Result<(), DisplayError>;

    /// User input coming from the display. Only the first caller receives events.
    fn events(&self) -> mpsc::Receiver<DisplayEvent>;
}
