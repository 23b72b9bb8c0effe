use crate::device_camera::interface::{CameraError, DeviceCamera};
use crate::library::logger::interface::Logger;
use image::{Rgb, RgbImage};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct FakeStream {
    active_tracks: usize,
    frames_captured: u64,
}

pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    stream: Mutex<FakeStream>,
    deny_permission: bool,
    width: u32,
    height: u32,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            stream: Mutex::new(FakeStream::default()),
            deny_permission: false,
            width: 640,
            height: 480,
        }
    }

    /// A camera whose access request is always refused.
    pub fn denying(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            deny_permission: true,
            ..Self::new(logger)
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn active_tracks(&self) -> usize {
        self.lock().active_tracks
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeStream> {
        self.stream.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn test_pattern(&self, frame_index: u64) -> RgbImage {
        let shift = (frame_index * 8) as u32;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb([
                ((x + shift) % 256) as u8,
                (y % 256) as u8,
                ((x + y) % 256) as u8,
            ])
        })
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self) -> Result<(), CameraError> {
        if self.deny_permission {
            let _ = self.logger.warn("Camera access denied");
            return Err(CameraError::PermissionDenied(
                "user refused camera access".to_string(),
            ));
        }

        let mut stream = self.lock();
        if stream.active_tracks == 0 {
            stream.active_tracks = 1;
            let _ = self.logger.info("Camera started");
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), CameraError> {
        let mut stream = self.lock();
        if stream.active_tracks > 0 {
            stream.active_tracks = 0;
            let _ = self.logger.info("Camera stopped");
        }
        Ok(())
    }

    fn capture_frame(&self) -> Result<Option<RgbImage>, CameraError> {
        let mut stream = self.lock();
        if stream.active_tracks == 0 {
            return Ok(None);
        }
        stream.frames_captured += 1;
        let frame_index = stream.frames_captured;
        drop(stream);

        Ok(Some(self.test_pattern(frame_index)))
    }

    fn is_active(&self) -> bool {
        self.active_tracks() > 0
    }
}
