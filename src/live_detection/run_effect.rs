use super::main::LiveDetection;
use crate::device_display::interface::DisplayEvent;
use crate::frame::encode::encode_payload;
use crate::live_detection::core::{CaptureError, Effect, Event};
use std::time::Instant;

impl LiveDetection {
    pub fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::SubscribeTick => loop {
                std::thread::sleep(self.config.tick_rate);
                if self.event_sender.send(Event::Tick(Instant::now())).is_err() {
                    break;
                }
            },
            Effect::SubscribePreview => loop {
                std::thread::sleep(self.config.preview_rate);
                if let Err(e) = self.show_preview() {
                    let _ = self.logger.warn(&format!("Preview frame dropped: {}", e));
                }
            },
            Effect::SubscribeDisplay => {
                let events = self.display().events();
                while let Ok(event) = events.recv() {
                    let event = match event {
                        DisplayEvent::ToggleStreaming => Event::ToggleStreaming(Instant::now()),
                        DisplayEvent::Closed => Event::DisplayClosed,
                    };
                    if self.event_sender.send(event).is_err() {
                        break;
                    }
                }
            }
            Effect::StartCamera => {
                let result = self.device_camera.start();
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Error accessing camera: {}", e));
                }
                self.send(Event::CameraStartDone(result));
            }
            Effect::StopCamera => {
                let result = self.device_camera.stop();
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Error releasing camera: {}", e));
                }
                self.send(Event::CameraStopDone(result));
            }
            Effect::CaptureFrame { cycle } => {
                let result = self.capture_payload();
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Frame capture failed: {}", e));
                }
                self.send(Event::FrameCaptureDone { cycle, result });
            }
            Effect::Detect { cycle, payload } => {
                let result = self.object_detector.detect(&payload);
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Detection failed: {}", e));
                }
                self.send(Event::DetectDone { cycle, result });
            }
            Effect::Exit => {}
        }
    }

    /// Keeps the live view moving between sampling cycles.
    fn show_preview(&self) -> Result<(), CaptureError> {
        if !self.device_camera.is_active() {
            return Ok(());
        }
        if let Some(frame) = self.device_camera.capture_frame()? {
            let mut display = self.display();
            display.resize(frame.width(), frame.height())?;
            display.show_frame(&frame)?;
        }
        Ok(())
    }

    /// Grabs the current frame, shows it on the surface and encodes it for the detector.
    /// Resize, draw and encode always happen in that order.
    pub fn capture_payload(&self) -> Result<Option<String>, CaptureError> {
        let Some(frame) = self.device_camera.capture_frame()? else {
            return Ok(None);
        };

        {
            let mut display = self.display();
            display.resize(frame.width(), frame.height())?;
            display.show_frame(&frame)?;
        }

        Ok(encode_payload(&frame, self.config.jpeg_quality)?)
    }
}
