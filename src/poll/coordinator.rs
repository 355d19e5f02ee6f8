//! Poll coordinator - fetch, extract, and publish one reading per cycle
//!
//! This module owns the retry policy:
//! - An authentication failure triggers exactly one re-login and one retry
//! - Connection and parsing failures are surfaced straight away
//! - A failure never clears the last good reading

use crate::config::Config;
use crate::extract::{extract_reading, Reading};
use crate::output::Snapshot;
use crate::portal::{ClientOptions, Credentials, SessionClient};
use crate::state::PollState;
use crate::{ErrorKind, PortalError, WatchError};
use std::time::Duration;
use tokio::sync::watch;

/// Drives poll cycles against a single portal session
pub struct PollCoordinator {
    client: SessionClient,
    reading_path: String,
    interval: Duration,
    state: PollState,
    publisher: watch::Sender<PollState>,
    ready: bool,
}

impl PollCoordinator {
    /// Creates a coordinator around an existing client
    ///
    /// # Arguments
    ///
    /// * `client` - The session client; the coordinator becomes its only owner
    /// * `reading_path` - Portal path of the tank page
    /// * `interval` - Time between scheduled cycles
    pub fn new(client: SessionClient, reading_path: impl Into<String>, interval: Duration) -> Self {
        let (publisher, _) = watch::channel(PollState::default());
        Self {
            client,
            reading_path: reading_path.into(),
            interval,
            state: PollState::default(),
            publisher,
            ready: false,
        }
    }

    /// Builds the client and coordinator described by a configuration
    pub fn from_config(config: &Config) -> Result<Self, WatchError> {
        let credentials = Credentials::from_config(config)?;
        let options = ClientOptions::from_config(config)?;
        let client = SessionClient::new(credentials, options)?;

        Ok(Self::new(
            client,
            config.portal.reading_path.clone(),
            config.poll.interval(),
        ))
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut SessionClient {
        &mut self.client
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true once the first refresh has succeeded
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns the state published by the most recent cycle
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Returns the output mapping for the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(&self.state)
    }

    /// Subscribes to the state published after every completed cycle
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.publisher.subscribe()
    }

    /// Runs the initial cycle
    ///
    /// The coordinator is only ready once this succeeds. A failure is returned
    /// to the caller as-is; it is fatal to startup and not retried here.
    pub async fn first_refresh(&mut self) -> Result<Reading, PortalError> {
        let reading = self.refresh().await?;
        self.ready = true;
        tracing::info!("Initial refresh complete: {}", reading);
        Ok(reading)
    }

    /// Runs one poll cycle and publishes the outcome
    ///
    /// # Cycle
    ///
    /// 1. Fetch the tank page with the current session
    /// 2. Extract the reading
    /// 3. On an authentication failure, log in once and repeat steps 1-2 once
    /// 4. Record success or failure in the poll state and publish it
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` - The new reading, now cached in the state
    /// * `Err(PortalError)` - The failure that ended the cycle; the previously
    ///   cached reading is left untouched
    pub async fn refresh(&mut self) -> Result<Reading, PortalError> {
        let outcome = match self.fetch_reading().await {
            Err(e) if e.kind() == ErrorKind::Authentication => {
                tracing::warn!("Session expired, attempting to re-authenticate");
                match self.client.login().await {
                    Ok(()) => self.fetch_reading().await,
                    Err(login_err) => Err(login_err),
                }
            }
            other => other,
        };

        match &outcome {
            Ok(reading) => {
                tracing::info!("Poll cycle succeeded: {}", reading);
                self.state.record_success(reading.clone());
            }
            Err(e) => {
                tracing::error!("Poll cycle failed: {}", e);
                self.state.record_failure(e.clone());
            }
        }

        self.publisher.send_replace(self.state.clone());
        outcome
    }

    async fn fetch_reading(&mut self) -> Result<Reading, PortalError> {
        let html = self.client.fetch_authenticated(&self.reading_path).await?;
        extract_reading(&html)
    }

    /// Closes the portal session
    pub fn shutdown(&mut self) {
        self.client.close();
    }
}
