use serde::{Deserialize, Serialize};

/// Form body for Twilio's Calls resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallParams {
    pub url: String,
    pub to: String,
    pub from: String,
}

#[derive(Debug, Deserialize)]
pub struct CallResponse {
    pub sid: String,
    #[serde(default)]
    pub status: String,
}

/// Twilio's error document, returned with 4xx/5xx responses.
#[derive(Debug, Deserialize)]
pub struct TwilioErrorBody {
    #[serde(default)]
    pub code: Option<u32>,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}
