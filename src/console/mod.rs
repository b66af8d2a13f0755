//! Admin console controller
//!
//! Owns the [`ConsoleState`] and performs the side effects its events ask
//! for: checking the admin password, loading and resetting statistics, and
//! running certificate exports.

pub mod credentials;
pub mod state;

pub use credentials::{CredentialCheck, DenyAll, SharedSecret};
pub use state::{ConsoleEvent, ConsoleState, Modal, OverlayId};

use crate::client::StatsClient;
use crate::export::{CertificateExporter, ExportError, ExportedFile, FileFormat};

pub struct Console {
    state: ConsoleState,
    credentials: Box<dyn CredentialCheck>,
}

impl Console {
    pub fn new(state: ConsoleState, credentials: Box<dyn CredentialCheck>) -> Self {
        Self { state, credentials }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn dispatch(&mut self, event: ConsoleEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }

    pub fn submit_password(&mut self, password: &str) {
        let accepted = self.credentials.verify(password);
        if !accepted {
            tracing::warn!("Admin password rejected");
        }
        self.dispatch(ConsoleEvent::PasswordSubmitted { accepted });
    }

    /// Load the history if the admin view is open and unlocked.
    pub async fn refresh_statistics(&mut self, client: &StatsClient) {
        if !self.state.wants_statistics() {
            return;
        }

        match client.fetch_statistics().await {
            Ok(history) => self.dispatch(ConsoleEvent::StatisticsLoaded(history)),
            Err(e) => {
                tracing::error!("Failed to fetch statistics: {}", e);
                self.dispatch(ConsoleEvent::StatisticsFailed);
            }
        }
    }

    /// Run the reset after the confirmation modal was accepted.
    pub async fn confirm_reset(&mut self, client: &StatsClient) {
        self.dispatch(ConsoleEvent::ResetConfirmed);

        match client.reset_statistics().await {
            Ok(_) => self.dispatch(ConsoleEvent::HistoryCleared),
            Err(e) => {
                tracing::error!("Failed to reset statistics: {}", e);
                self.dispatch(ConsoleEvent::ResetFailed);
            }
        }
    }

    /// Export the current certificate. Only the blank-field guard reaches the
    /// user; other failures are logged by the exporter.
    pub async fn export_certificate(
        &mut self,
        exporter: &CertificateExporter<'_>,
        format: FileFormat,
    ) -> Option<ExportedFile> {
        let request = self.state.certificate_request(format);

        self.dispatch(ConsoleEvent::ExportStarted);
        let result = exporter.export(&request).await;
        self.dispatch(ConsoleEvent::ExportFinished);

        match result {
            Ok(file) => Some(file),
            Err(ExportError::MissingFields) => {
                self.dispatch(ConsoleEvent::ExportRejected);
                None
            }
            Err(e) => {
                tracing::debug!("Certificate export dropped: {}", e);
                None
            }
        }
    }
}
