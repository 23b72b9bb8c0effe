use crate::device_display::interface::{DeviceDisplay, DisplayError};
use crate::object_detector::interface::Detection;
use crate::overlay::shape::{Color, Rect, StrokeStyle, TextStyle};

pub const BOX_STYLE: StrokeStyle = StrokeStyle {
    color: Color::RED,
    line_width: 2.0,
};

pub const LABEL_STYLE: TextStyle = TextStyle {
    color: Color::RED,
    font_size: 14.0,
};

/// Distance between a label's baseline and the top edge of its box.
pub const LABEL_OFFSET: f32 = 5.0;

pub fn label_text(detection: &Detection) -> String {
    format!("{} ({:.2}%)", detection.label, detection.score * 100.0)
}

/// Replaces everything on the overlay with `detections`, drawn in the order received.
pub fn render_detections(
    display: &mut dyn DeviceDisplay,
    detections: &[Detection],
) -> Result<(), DisplayError> {
    display.clear()?;

    for detection in detections {
        let b = &detection.bounding_box;
        let rect = Rect::from_corners(b.xmin as f32, b.ymin as f32, b.xmax as f32, b.ymax as f32);

        display.stroke_rect(rect, BOX_STYLE)?;
        display.fill_text(
            &label_text(detection),
            rect.x,
            rect.y - LABEL_OFFSET,
            LABEL_STYLE,
        )?;
    }

    Ok(())
}
