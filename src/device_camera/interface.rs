use image::RgbImage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("camera access denied: {0}")]
    PermissionDenied(String),
    #[error("camera device error: {0}")]
    Device(String),
}

/// A video-only capture device. At most one stream is bound at a time.
pub trait DeviceCamera: Send + Sync {
    /// Acquire the camera and bind its stream. Starting an already bound camera is a no-op.
    fn start(&self) -> Result<(), CameraError>;

    /// Stop every active track and release the device. A no-op when nothing is bound.
    fn stop(&self) -> Result<(), CameraError>;

    /// The current frame, or `None` when no stream is bound.
    fn capture_frame(&self) -> Result<Option<RgbImage>, CameraError>;

    fn is_active(&self) -> bool;
}
