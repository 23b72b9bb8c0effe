use clap::Parser;
use cli::{Args, CameraKind, DetectorKind, DisplayKind};
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::interface::DeviceCamera;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use live_detection::main::LiveDetection;
use object_detector::impl_fake::ObjectDetectorFake;
use object_detector::impl_http::ObjectDetectorHttp;
use object_detector::interface::ObjectDetector;
use std::sync::{Arc, Mutex};

mod cli;
mod config;
mod device_camera;
mod device_display;
mod frame;
mod library;
mod live_detection;
mod object_detector;
mod overlay;

fn build_camera(
    kind: CameraKind,
    index: u32,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    match kind {
        CameraKind::Fake => Arc::new(DeviceCameraFake::new(logger)),
        #[cfg(feature = "webcam")]
        CameraKind::Webcam => Arc::new(device_camera::impl_nokhwa::DeviceCameraNokhwa::new(
            index, logger,
        )),
        #[cfg(not(feature = "webcam"))]
        CameraKind::Webcam => {
            let _ = logger.warn(&format!(
                "Built without the `webcam` feature, using the fake camera instead of camera {}",
                index
            ));
            Arc::new(DeviceCameraFake::new(logger))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (camera_kind, display_kind, detector_kind) = (args.camera, args.display, args.detector);
    let config = args.into_config();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera = build_camera(camera_kind, config.camera_index, logger.clone());

    let object_detector: Arc<dyn ObjectDetector + Send + Sync> = match detector_kind {
        DetectorKind::Http => Arc::new(ObjectDetectorHttp::new(&config, logger.clone())),
        DetectorKind::Fake => Arc::new(ObjectDetectorFake::new(logger.clone())),
    };

    match display_kind {
        DisplayKind::Console => {
            let device_display = Arc::new(Mutex::new(DeviceDisplayConsole::new(logger.clone())));
            let live_detection = LiveDetection::new(
                config,
                logger,
                device_camera,
                device_display,
                object_detector,
            );
            live_detection.run();
        }
        DisplayKind::Gui => {
            let display = DeviceDisplayGui::new();
            let window = display.window();
            let live_detection = LiveDetection::new(
                config,
                logger.clone(),
                device_camera,
                Arc::new(Mutex::new(display)),
                object_detector,
            );

            let event_loop = std::thread::spawn(move || live_detection.run());

            window.run()?;

            if event_loop.join().is_err() {
                let _ = logger.error("Event loop panicked");
            }
        }
    }

    Ok(())
}
