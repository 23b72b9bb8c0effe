use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::object_detector::interface::{DetectError, Detection, ObjectDetector};
use crate::object_detector::response::{parse_response, request_body, InferenceResponse};
use std::sync::Arc;

/// Hosted inference API client.
///
/// The bearer token is sent from this process. Anyone who can inspect the process
/// can read it; a deployment that cannot trust its clients should put a proxy that
/// holds the token in front of the endpoint and point `inference_endpoint` at it.
pub struct ObjectDetectorHttp {
    agent: ureq::Agent,
    endpoint: String,
    token: Option<String>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ObjectDetectorHttp {
    pub fn new(config: &Config, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout)
            .build();
        let logger = logger.with_namespace("detector").with_namespace("http");

        if config.inference_token.is_none() {
            let _ = logger.warn("No inference token configured, requests are sent unauthenticated");
        }

        Self {
            agent,
            endpoint: config.inference_endpoint.clone(),
            token: config.inference_token.clone(),
            logger,
        }
    }

    fn post(&self, body: &str) -> Result<String, DetectError> {
        let mut request = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        match request.send_string(body) {
            Ok(response) => response
                .into_string()
                .map_err(|e| DetectError::Transport(e.to_string())),
            Err(ureq::Error::Status(status, response)) => {
                let body = response
                    .into_string()
                    .map_err(|e| DetectError::Transport(e.to_string()))?;
                // Error-shaped JSON bodies are still answers from the endpoint.
                if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                    let _ = self
                        .logger
                        .warn(&format!("Inference endpoint answered with status {}", status));
                    Ok(body)
                } else {
                    Err(DetectError::Status { status, body })
                }
            }
            Err(e) => Err(DetectError::Transport(e.to_string())),
        }
    }
}

impl ObjectDetector for ObjectDetectorHttp {
    fn detect(&self, payload: &str) -> Result<Vec<Detection>, DetectError> {
        let body = request_body(payload)?;
        let response = self.post(&body)?;

        match parse_response(&response)? {
            InferenceResponse::Detections(detections) => {
                let _ = self
                    .logger
                    .info(&format!("Received {} detections", detections.len()));
                Ok(detections)
            }
            InferenceResponse::Rejected(reason) => {
                let _ = self
                    .logger
                    .warn(&format!("Inference rejected, treating as no detections: {}", reason));
                Ok(vec![])
            }
        }
    }
}
