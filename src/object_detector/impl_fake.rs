use crate::library::logger::interface::Logger;
use crate::object_detector::interface::{BoundingBox, DetectError, Detection, ObjectDetector};
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct ObjectDetectorFake {
    logger: Arc<dyn Logger + Send + Sync>,
    scripted: Mutex<VecDeque<Result<Vec<Detection>, DetectError>>>,
    calls: AtomicUsize,
}

impl ObjectDetectorFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("detector").with_namespace("fake"),
            scripted: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answers with `responses` in order, then falls back to random detections.
    pub fn with_responses(
        logger: Arc<dyn Logger + Send + Sync>,
        responses: Vec<Result<Vec<Detection>, DetectError>>,
    ) -> Self {
        Self {
            scripted: Mutex::new(responses.into()),
            ..Self::new(logger)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_detections(&self) -> Result<Vec<Detection>, DetectError> {
        let objects = vec![
            "person", "dog", "cat", "car", "chair", "cup", "bottle", "laptop", "book", "clock",
        ];

        let mut rng = rand::rng();
        let err = |e: rand::distr::uniform::Error| DetectError::Transport(e.to_string());

        let index_dist = Uniform::new(0, objects.len()).map_err(err)?;
        let score_dist = Uniform::new(0.5, 1.0).map_err(err)?;
        let position_dist = Uniform::new(0.0, 400.0).map_err(err)?;
        let size_dist = Uniform::new(40.0, 200.0).map_err(err)?;

        let count = Uniform::new_inclusive(0, 3).map_err(err)?.sample(&mut rng);

        Ok((0..count)
            .map(|_| {
                let xmin: f64 = position_dist.sample(&mut rng);
                let ymin: f64 = position_dist.sample(&mut rng);
                Detection {
                    label: objects[index_dist.sample(&mut rng)].to_string(),
                    score: score_dist.sample(&mut rng),
                    bounding_box: BoundingBox {
                        xmin,
                        ymin,
                        xmax: xmin + size_dist.sample(&mut rng),
                        ymax: ymin + size_dist.sample(&mut rng),
                    },
                }
            })
            .collect())
    }
}

impl ObjectDetector for ObjectDetectorFake {
    fn detect(&self, payload: &str) -> Result<Vec<Detection>, DetectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self
            .logger
            .info(&format!("Detecting on payload of {} bytes", payload.len()));

        let scripted = self
            .scripted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match scripted {
            Some(response) => response,
            None => self.random_detections(),
        }
    }
}
