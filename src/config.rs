use chrono::Offset;
use std::time::Duration;

pub const DEFAULT_INFERENCE_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/facebook/detr-resnet-50";

#[derive(Debug, Clone)]
pub struct Config {
    /// Period between two sampling cycles while streaming.
    pub sample_rate: Duration,
    /// Granularity of the clock that drives the sampler.
    pub tick_rate: Duration,
    /// How often the live view is refreshed between sampling cycles.
    pub preview_rate: Duration,
    pub inference_endpoint: String,
    /// Bearer token sent to the inference endpoint. Never compiled in.
    pub inference_token: Option<String>,
    pub request_timeout: Duration,
    pub jpeg_quality: u8,
    pub camera_index: u32,
    pub start_streaming: bool,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: Duration::from_millis(2000),
            tick_rate: Duration::from_millis(50),
            preview_rate: Duration::from_millis(66),
            inference_endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            inference_token: None,
            request_timeout: Duration::from_secs(30),
            jpeg_quality: 92,
            camera_index: 0,
            start_streaming: false,
            logger_timezone: local_timezone(),
        }
    }
}

fn local_timezone() -> chrono::FixedOffset {
    chrono::Local::now().offset().fix()
}
