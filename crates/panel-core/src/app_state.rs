//! Startup state and error types for the panel
//!
//! Bring-up is an explicit state machine:
//! `Disconnected → Connecting → Connected → Listening`, with `Failed`
//! reachable from any step. Each failed step yields a typed [`AppError`] and
//! the caller picks the retry policy.

use core::fmt::{Debug, Write};
use core::net::Ipv4Addr;

use thiserror_no_std::Error;

use crate::config::ConfigError;

/// Short free-form detail attached to driver errors
pub type ErrorDetail = heapless::String<64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRunState {
    Disconnected,
    Connecting,
    Connected,
    Listening,
    Failed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Wi-Fi init failed: {0}")]
    WifiInit(ErrorDetail),
    #[error("Wi-Fi connect timed out after {timeout_ms} ms")]
    WifiConnectTimeout { timeout_ms: u32 },
    #[error("Wi-Fi connect failed: {0}")]
    WifiConnect(ErrorDetail),
    #[error("TCP socket creation failed")]
    SocketCreate,
    #[error("bind to port {port} failed")]
    Bind { port: u16 },
    #[error("failed to spawn the {0} task")]
    TaskSpawn(&'static str),
    #[error("invalid startup transition {from:?} -> {to:?}")]
    InvalidTransition { from: AppRunState, to: AppRunState },
}

/// Render a driver error into an [`ErrorDetail`], truncating if needed.
pub fn describe<E: Debug>(error: &E) -> ErrorDetail {
    let mut detail = ErrorDetail::new();
    // Overflow only truncates the detail
    let _ = write!(detail, "{:?}", error);
    detail
}

/// Tracks startup progress and the outcome of each attempt.
#[derive(Debug, Clone)]
pub struct Startup {
    state: AppRunState,
    address: Option<Ipv4Addr>,
    port: Option<u16>,
    attempts: u8,
    last_error: Option<AppError>,
}

impl Startup {
    pub const fn new() -> Self {
        Self {
            state: AppRunState::Disconnected,
            address: None,
            port: None,
            attempts: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> AppRunState {
        self.state
    }

    /// Address assigned once connected
    pub fn address(&self) -> Option<Ipv4Addr> {
        self.address
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Number of connection attempts started so far
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Start a connection attempt. Allowed from `Disconnected`, or from
    /// `Failed` to retry.
    pub fn begin_connect(&mut self) -> Result<(), AppError> {
        self.transition(
            AppRunState::Connecting,
            matches!(self.state, AppRunState::Disconnected | AppRunState::Failed),
        )?;
        if let Some(error) = self.last_error.take() {
            log::info!("retrying after: {}", error);
        }
        self.attempts = self.attempts.saturating_add(1);
        self.address = None;
        self.port = None;
        Ok(())
    }

    /// The link is up and the interface has `address`.
    pub fn connected(&mut self, address: Ipv4Addr) -> Result<(), AppError> {
        self.transition(AppRunState::Connected, self.state == AppRunState::Connecting)?;
        self.address = Some(address);
        Ok(())
    }

    /// The listener is accepting connections on `port`.
    pub fn listening(&mut self, port: u16) -> Result<(), AppError> {
        self.transition(AppRunState::Listening, self.state == AppRunState::Connected)?;
        self.port = Some(port);
        Ok(())
    }

    /// Record a failed step. Returns the error so callers can `return Err(startup.fail(e))`.
    pub fn fail(&mut self, error: AppError) -> AppError {
        log::error!("startup failed in {:?}: {}", self.state, error);
        self.state = AppRunState::Failed;
        self.last_error = Some(error.clone());
        error
    }

    /// Whether another attempt fits in `max_attempts`.
    pub fn can_retry(&self, max_attempts: u8) -> bool {
        self.state == AppRunState::Failed && self.attempts < max_attempts
    }

    fn transition(&mut self, to: AppRunState, allowed: bool) -> Result<(), AppError> {
        if !allowed {
            return Err(AppError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        log::debug!("startup {:?} -> {:?}", self.state, to);
        self.state = to;
        Ok(())
    }
}

impl Default for Startup {
    fn default() -> Self {
        Self::new()
    }
}
