use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use crate::live_detection::core::Event;
use crate::object_detector::interface::ObjectDetector;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct LiveDetection {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    pub object_detector: Arc<dyn ObjectDetector + Send + Sync>,
    pub event_sender: Sender<Event>,
    pub event_receiver: Arc<Mutex<Receiver<Event>>>,
}

impl LiveDetection {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        object_detector: Arc<dyn ObjectDetector + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();

        Self {
            config,
            logger: logger.with_namespace("live_detection"),
            device_camera,
            device_display,
            object_detector,
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
        }
    }

    pub fn send(&self, event: Event) {
        if self.event_sender.send(event).is_err() {
            let _ = self.logger.warn("Event loop is gone, dropping event");
        }
    }

    pub fn recv(&self) -> Option<Event> {
        self.event_receiver
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .recv()
            .ok()
    }

    pub fn display(&self) -> MutexGuard<'_, dyn DeviceDisplay + Send + Sync + 'static> {
        self.device_display
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
