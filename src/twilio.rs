use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use log::{debug, info};

use crate::config::Config;
use crate::types::{CallParams, CallResponse, TwilioErrorBody};

const USER_AGENT: &str = concat!("callmom-hook/", env!("CARGO_PKG_VERSION"));

/// Something that can place an outbound call.
#[async_trait]
pub trait CallPlacer: Send + Sync {
    async fn create_call(&self, params: &CallParams) -> anyhow::Result<CallResponse>;
}

/// Client for Twilio's REST Calls resource.
pub struct TwilioClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    api_base: String,
}

impl TwilioClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            api_base: config.api_base.clone(),
        })
    }

    fn calls_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_base, self.account_sid
        )
    }
}

#[async_trait]
impl CallPlacer for TwilioClient {
    async fn create_call(&self, params: &CallParams) -> anyhow::Result<CallResponse> {
        let url = self.calls_url();
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(params)
            .send()
            .await
            .context("Twilio request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<TwilioErrorBody>(&body) {
                Ok(err) => match err.code {
                    Some(code) => {
                        anyhow!("Twilio returned {}: {} (code {})", status, err.message, code)
                    }
                    None => anyhow!("Twilio returned {}: {}", status, err.message),
                },
                Err(_) => anyhow!("Twilio returned {}", status),
            });
        }

        let call: CallResponse = response
            .json()
            .await
            .context("unreadable Twilio call response")?;
        info!("Call {} created ({})", call.sid, call.status);
        Ok(call)
    }
}
