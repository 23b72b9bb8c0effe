use crate::config::{Config, DEFAULT_INFERENCE_ENDPOINT};
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CameraKind {
    /// Synthetic test pattern.
    Fake,
    /// Local webcam (needs the `webcam` feature).
    Webcam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisplayKind {
    Gui,
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetectorKind {
    /// Hosted inference endpoint.
    Http,
    /// Random detections, no network.
    Fake,
}

/// Live webcam object detection against a hosted inference API.
#[derive(Debug, Parser)]
#[command(name = "live-object-detection", version)]
pub struct Args {
    #[arg(long, value_enum, default_value_t = CameraKind::Webcam)]
    pub camera: CameraKind,

    #[arg(long, default_value_t = 0)]
    pub camera_index: u32,

    #[arg(long, value_enum, default_value_t = DisplayKind::Gui)]
    pub display: DisplayKind,

    #[arg(long, value_enum, default_value_t = DetectorKind::Http)]
    pub detector: DetectorKind,

    #[arg(long, default_value = DEFAULT_INFERENCE_ENDPOINT)]
    pub endpoint: String,

    /// Bearer token for the inference endpoint.
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Milliseconds between two frames sent for detection.
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub sample_rate_ms: u64,

    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[arg(long, default_value_t = 92, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// Start streaming right away instead of waiting for the toggle.
    #[arg(long)]
    pub start: bool,
}

impl Args {
    pub fn into_config(self) -> Config {
        Config {
            sample_rate: Duration::from_millis(self.sample_rate_ms),
            inference_endpoint: self.endpoint,
            inference_token: self.token.filter(|token| !token.trim().is_empty()),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            jpeg_quality: self.jpeg_quality,
            camera_index: self.camera_index,
            start_streaming: self.start,
            ..Config::default()
        }
    }
}
