use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

pub const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to encode frame: {0}")]
pub struct EncodeError(String);

pub fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode_image(frame)
        .map_err(|e| EncodeError(e.to_string()))?;
    Ok(buf)
}

/// Encodes the frame the way a canvas snapshot is exported: a base64 JPEG data URL.
pub fn to_data_url(frame: &RgbImage, quality: u8) -> Result<String, EncodeError> {
    let jpeg = encode_jpeg(frame, quality)?;
    Ok(format!(
        "{}{}",
        JPEG_DATA_URL_PREFIX,
        BASE64_STANDARD.encode(jpeg)
    ))
}

/// The payload after the first comma of a data URL, or `None` if there is no metadata prefix.
pub fn strip_data_url_prefix(data_url: &str) -> Option<&str> {
    data_url
        .split_once(',')
        .map(|(_, payload)| payload)
        .filter(|payload| !payload.is_empty())
}

/// Base64 JPEG payload ready to be sent as the `inputs` field of an inference request.
pub fn encode_payload(frame: &RgbImage, quality: u8) -> Result<Option<String>, EncodeError> {
    let data_url = to_data_url(frame, quality)?;
    Ok(strip_data_url_prefix(&data_url).map(str::to_string))
}
