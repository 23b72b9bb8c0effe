use crate::device_camera::interface::{CameraError, DeviceCamera};
use crate::library::logger::interface::Logger;
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

type FrameReply = mpsc::Sender<Result<RgbImage, CameraError>>;

enum Command {
    Capture(FrameReply),
    Stop,
}

struct Worker {
    commands: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
}

/// Webcam backed by `nokhwa`. The native handle is not `Send`, so it lives on a
/// dedicated thread for as long as the stream is bound.
pub struct DeviceCameraNokhwa {
    index: u32,
    logger: Arc<dyn Logger + Send + Sync>,
    worker: Mutex<Option<Worker>>,
}

impl DeviceCameraNokhwa {
    pub fn new(index: u32, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            index,
            logger: logger.with_namespace("camera").with_namespace("nokhwa"),
            worker: Mutex::new(None),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Worker>> {
        self.worker.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn open_camera(index: u32) -> Result<Camera, CameraError> {
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
    let mut camera = Camera::new(CameraIndex::Index(index), requested)
        .map_err(|e| CameraError::PermissionDenied(e.to_string()))?;
    camera
        .open_stream()
        .map_err(|e| CameraError::Device(e.to_string()))?;
    Ok(camera)
}

fn read_frame(camera: &mut Camera) -> Result<RgbImage, CameraError> {
    let buffer = camera
        .frame()
        .map_err(|e| CameraError::Device(e.to_string()))?;
    let decoded = buffer
        .decode_image::<RgbFormat>()
        .map_err(|e| CameraError::Device(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    RgbImage::from_raw(width, height, decoded.into_raw())
        .ok_or_else(|| CameraError::Device("frame buffer size mismatch".to_string()))
}

fn run_worker(
    index: u32,
    ready: mpsc::Sender<Result<(), CameraError>>,
    commands: mpsc::Receiver<Command>,
    logger: Arc<dyn Logger + Send + Sync>,
) {
    let mut camera = match open_camera(index) {
        Ok(camera) => {
            let _ = ready.send(Ok(()));
            camera
        }
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    while let Ok(command) = commands.recv() {
        match command {
            Command::Capture(reply) => {
                let _ = reply.send(read_frame(&mut camera));
            }
            Command::Stop => break,
        }
    }

    if let Err(e) = camera.stop_stream() {
        let _ = logger.error(&format!("Failed to stop camera stream: {}", e));
    }
}

impl DeviceCamera for DeviceCameraNokhwa {
    fn start(&self) -> Result<(), CameraError> {
        let mut worker = self.lock();
        if worker.is_some() {
            return Ok(());
        }

        let _ = self
            .logger
            .info(&format!("Requesting camera {}...", self.index));

        let (ready_tx, ready_rx) = mpsc::channel();
        let (command_tx, command_rx) = mpsc::channel();
        let index = self.index;
        let logger = self.logger.clone();
        let handle =
            std::thread::spawn(move || run_worker(index, ready_tx, command_rx, logger));

        let opened = ready_rx
            .recv()
            .map_err(|_| CameraError::Device("camera thread exited".to_string()))
            .and_then(|result| result);

        match opened {
            Ok(()) => {
                *worker = Some(Worker {
                    commands: command_tx,
                    handle,
                });
                let _ = self.logger.info("Camera started");
                Ok(())
            }
            Err(e) => {
                let _ = handle.join();
                Err(e)
            }
        }
    }

    fn stop(&self) -> Result<(), CameraError> {
        let Some(worker) = self.lock().take() else {
            return Ok(());
        };

        let _ = worker.commands.send(Command::Stop);
        worker
            .handle
            .join()
            .map_err(|_| CameraError::Device("camera thread panicked".to_string()))?;
        let _ = self.logger.info("Camera stopped");
        Ok(())
    }

    fn capture_frame(&self) -> Result<Option<RgbImage>, CameraError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        {
            let worker = self.lock();
            let Some(worker) = worker.as_ref() else {
                return Ok(None);
            };
            worker
                .commands
                .send(Command::Capture(reply_tx))
                .map_err(|_| CameraError::Device("camera thread exited".to_string()))?;
        }

        reply_rx
            .recv()
            .map_err(|_| CameraError::Device("camera thread exited".to_string()))?
            .map(Some)
    }

    fn is_active(&self) -> bool {
        self.lock().is_some()
    }
}

impl Drop for DeviceCameraNokhwa {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            let _ = self
                .logger
                .error(&format!("Failed to stop camera during shutdown: {}", e));
        }
    }
}
