use crate::object_detector::interface::{DetectError, Detection};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceResponse {
    Detections(Vec<Detection>),
    /// Valid JSON that is not a list of detections, such as `{"error": "Model is loading"}`.
    Rejected(String),
}

pub fn request_body(payload: &str) -> Result<String, DetectError> {
    serde_json::to_string(&InferenceRequest { inputs: payload })
        .map_err(|e| DetectError::Decode(e.to_string()))
}

pub fn parse_response(body: &str) -> Result<InferenceResponse, DetectError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| DetectError::Decode(e.to_string()))?;

    match value {
        Value::Array(_) => match serde_json::from_value::<Vec<Detection>>(value) {
            Ok(detections) => Ok(InferenceResponse::Detections(detections)),
            Err(e) => Ok(InferenceResponse::Rejected(format!(
                "malformed detection list: {}",
                e
            ))),
        },
        Value::Object(ref fields) => {
            let reason = match fields.get("error") {
                Some(Value::String(message)) => message.clone(),
                Some(other) => other.to_string(),
                None => value.to_string(),
            };
            Ok(InferenceResponse::Rejected(reason))
        }
        other => Ok(InferenceResponse::Rejected(other.to_string())),
    }
}
