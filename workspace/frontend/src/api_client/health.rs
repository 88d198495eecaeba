use async_trait::async_trait;
use client::api_base::HEALTH_PATH;
use client::{ClientError, HealthProbe, Result};
use gloo_net::http::Request;
use web_sys::AbortController;

/// Aborts the in-flight fetch when the probe future is dropped, e.g. after it
/// lost the race or hit its timeout.
struct AbortOnDrop(Option<AbortController>);

impl AbortOnDrop {
    fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(controller) = &self.0 {
            controller.abort();
        }
    }
}

/// `GET {base}/health` against an arbitrary candidate base.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpHealthProbe;

#[async_trait(?Send)]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self, base: &str) -> Result<()> {
        let url = format!("{}{}", base.trim_end_matches('/'), HEALTH_PATH);
        log::trace!("Probing {}", url);

        let mut guard = AbortOnDrop(AbortController::new().ok());
        let signal = guard.0.as_ref().map(AbortController::signal);

        let response = Request::get(&url)
            .abort_signal(signal.as_ref())
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        guard.disarm();

        if response.ok() {
            log::debug!("{} is healthy", url);
            Ok(())
        } else {
            Err(ClientError::Http(response.status()))
        }
    }
}
