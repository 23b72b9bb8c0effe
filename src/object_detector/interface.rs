use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// One labeled box returned by the inference endpoint. `score` is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub score: f64,
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectError {
    #[error("inference request failed: {0}")]
    Transport(String),
    #[error("inference endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("inference response is not valid JSON: {0}")]
    Decode(String),
}

pub trait ObjectDetector: Send + Sync {
    /// Runs detection on a base64 JPEG payload (no data URL prefix).
    fn detect(&self, payload: &str) -> Result<Vec<Detection>, DetectError>;
}
