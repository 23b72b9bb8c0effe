use crate::config::Config;
use crate::device_camera::interface::CameraError;
use crate::device_display::interface::{DisplayError, Status};
use crate::frame::encode::EncodeError;
use crate::object_detector::interface::{DetectError, Detection};
use std::time::Instant;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    #[default]
    Idle,
    Streaming,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum CameraState {
    #[default]
    Released,
    Acquiring,
    Bound,
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capturing,
    Detecting,
}

/// The one sampling cycle allowed to be outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    pub cycle: u64,
    pub phase: Phase,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Model {
    pub stream: StreamState,
    pub camera: CameraState,
    /// When the next sampling cycle is due. `None` while the timer is cancelled.
    pub next_sample_at: Option<Instant>,
    pub cycle: u64,
    pub in_flight: Option<InFlight>,
    pub detections: Vec<Detection>,
    pub last_error: Option<String>,
}

impl Model {
    pub fn is_streaming(&self) -> bool {
        self.stream == StreamState::Streaming
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.in_flight,
            Some(InFlight {
                phase: Phase::Detecting,
                ..
            })
        )
    }

    pub fn status(&self) -> Status {
        Status {
            streaming: self.is_streaming(),
            loading: self.is_loading(),
            error: self.last_error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Tick(Instant),
    SetStreaming { streaming: bool, now: Instant },
    ToggleStreaming(Instant),
    CameraStartDone(Result<(), CameraError>),
    CameraStopDone(Result<(), CameraError>),
    FrameCaptureDone {
        cycle: u64,
        result: Result<Option<String>, CaptureError>,
    },
    DetectDone {
        cycle: u64,
        result: Result<Vec<Detection>, DetectError>,
    },
    DisplayClosed,
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::FrameCaptureDone {
                cycle,
                result: Ok(Some(payload)),
            } => format!(
                "FrameCaptureDone {{ cycle: {}, payload: {} bytes }}",
                cycle,
                payload.len()
            ),
            event => format!("{:?}", event),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubscribeTick,
    SubscribePreview,
    SubscribeDisplay,
    StartCamera,
    StopCamera,
    CaptureFrame { cycle: u64 },
    Detect { cycle: u64, payload: String },
    Exit,
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::Detect { cycle, payload } => format!(
                "Detect {{ cycle: {}, payload: {} bytes }}",
                cycle,
                payload.len()
            ),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init() -> (Model, Vec<Effect>) {
    (
        Model::default(),
        vec![
            Effect::SubscribeTick,
            Effect::SubscribePreview,
            Effect::SubscribeDisplay,
        ],
    )
}

pub fn transition(config: &Config, model: Model, event: Event) -> (Model, Vec<Effect>) {
    match event {
        Event::ToggleStreaming(now) => {
            let streaming = !model.is_streaming();
            set_streaming(config, model, streaming, now)
        }
        Event::SetStreaming { streaming, now } => set_streaming(config, model, streaming, now),

        Event::CameraStartDone(result) => match (model.is_streaming(), result) {
            (true, Ok(())) => (
                Model {
                    camera: CameraState::Bound,
                    last_error: None,
                    ..model
                },
                vec![],
            ),
            (true, Err(e)) => (
                Model {
                    camera: CameraState::Unavailable(e.to_string()),
                    last_error: Some(e.to_string()),
                    ..model
                },
                vec![],
            ),
            // The user stopped before access was granted.
            (false, Ok(())) => (model, vec![Effect::StopCamera]),
            (false, Err(_)) => (model, vec![]),
        },
        Event::CameraStopDone(result) => match result {
            Ok(()) => (model, vec![]),
            Err(e) => (
                Model {
                    last_error: Some(e.to_string()),
                    ..model
                },
                vec![],
            ),
        },

        Event::Tick(now) => tick(config, model, now),

        Event::FrameCaptureDone { cycle, result } => {
            if !is_current(&model, cycle, Phase::Capturing) {
                return (model, vec![]);
            }
            match result {
                Ok(Some(payload)) => (
                    Model {
                        in_flight: Some(InFlight {
                            cycle,
                            phase: Phase::Detecting,
                        }),
                        ..model
                    },
                    vec![Effect::Detect { cycle, payload }],
                ),
                // No frame available yet, skip this cycle silently.
                Ok(None) => (
                    Model {
                        in_flight: None,
                        ..model
                    },
                    vec![],
                ),
                Err(e) => (
                    Model {
                        in_flight: None,
                        last_error: Some(e.to_string()),
                        ..model
                    },
                    vec![],
                ),
            }
        }

        Event::DetectDone { cycle, result } => {
            if !is_current(&model, cycle, Phase::Detecting) {
                return (model, vec![]);
            }
            match result {
                Ok(detections) => (
                    Model {
                        in_flight: None,
                        detections,
                        last_error: None,
                        ..model
                    },
                    vec![],
                ),
                Err(e) => (
                    Model {
                        in_flight: None,
                        last_error: Some(e.to_string()),
                        ..model
                    },
                    vec![],
                ),
            }
        }

        Event::DisplayClosed => {
            let mut effects = vec![];
            if model.is_streaming() {
                effects.push(Effect::StopCamera);
            }
            effects.push(Effect::Exit);
            (stopped(model), effects)
        }
    }
}

fn set_streaming(config: &Config, model: Model, streaming: bool, now: Instant) -> (Model, Vec<Effect>) {
    match (model.stream, streaming) {
        (StreamState::Idle, true) => (
            Model {
                stream: StreamState::Streaming,
                camera: CameraState::Acquiring,
                next_sample_at: Some(now + config.sample_rate),
                last_error: None,
                ..model
            },
            vec![Effect::StartCamera],
        ),
        (StreamState::Streaming, false) => (stopped(model), vec![Effect::StopCamera]),
        _ => (model, vec![]),
    }
}

/// Cancels the timer and forgets the in-flight cycle. A response still on its way
/// carries a cycle id that no longer matches and is dropped.
fn stopped(model: Model) -> Model {
    Model {
        stream: StreamState::Idle,
        camera: CameraState::Released,
        next_sample_at: None,
        in_flight: None,
        detections: vec![],
        ..model
    }
}

fn tick(config: &Config, model: Model, now: Instant) -> (Model, Vec<Effect>) {
    let due = match model.next_sample_at {
        Some(due) if model.is_streaming() && now >= due => due,
        _ => return (model, vec![]),
    };

    let mut next = due + config.sample_rate;
    while next <= now {
        next += config.sample_rate;
    }

    // Single flight: the previous cycle has not finished, wait for the next period.
    if model.in_flight.is_some() {
        return (
            Model {
                next_sample_at: Some(next),
                ..model
            },
            vec![],
        );
    }

    let cycle = model.cycle + 1;
    (
        Model {
            next_sample_at: Some(next),
            cycle,
            in_flight: Some(InFlight {
                cycle,
                phase: Phase::Capturing,
            }),
            ..model
        },
        vec![Effect::CaptureFrame { cycle }],
    )
}

fn is_current(model: &Model, cycle: u64, phase: Phase) -> bool {
    model.is_streaming() && model.in_flight == Some(InFlight { cycle, phase })
}
