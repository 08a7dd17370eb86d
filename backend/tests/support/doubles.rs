//! Recording doubles for the identity provider and action logger ports.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use server_actions::domain::ports::{
    ActionLogger, IdentityProvider, IdentityProviderError, LogLevel, SocialProvider,
};
use server_actions::domain::{RequestContext, Session};
use url::Url;

/// How the recording identity provider answers session lookups.
#[derive(Debug, Clone)]
pub enum SessionAnswer {
    Active(Session),
    Anonymous,
    Unavailable(String),
}

/// Identity provider answering from a configurable script and counting calls.
#[derive(Clone)]
pub struct RecordingIdentityProvider {
    answer: Arc<Mutex<SessionAnswer>>,
    lookups: Arc<Mutex<usize>>,
}

impl RecordingIdentityProvider {
    pub fn new(answer: SessionAnswer) -> Self {
        Self {
            answer: Arc::new(Mutex::new(answer)),
            lookups: Arc::new(Mutex::new(0)),
        }
    }

    pub fn set_answer(&self, answer: SessionAnswer) {
        *self.answer.lock().unwrap_or_else(PoisonError::into_inner) = answer;
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentityProvider {
    async fn get_session(
        &self,
        _context: &RequestContext,
    ) -> Result<Option<Session>, IdentityProviderError> {
        *self.lookups.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        let answer = self
            .answer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match answer {
            SessionAnswer::Active(session) => Ok(Some(session)),
            SessionAnswer::Anonymous => Ok(None),
            SessionAnswer::Unavailable(message) => Err(IdentityProviderError::transport(message)),
        }
    }

    async fn sign_out(&self, _context: &RequestContext) -> Result<(), IdentityProviderError> {
        Ok(())
    }

    async fn start_social_sign_in(
        &self,
        provider: &SocialProvider,
    ) -> Result<Url, IdentityProviderError> {
        Url::parse(&format!("https://accounts.example.test/{provider}"))
            .map_err(|err| IdentityProviderError::invalid_request(err.to_string()))
    }
}

/// One captured log call.
#[derive(Debug, Clone)]
pub struct LoggedRecord {
    pub level: LogLevel,
    pub payload: Value,
    pub message: String,
}

/// Action logger keeping every record.
#[derive(Clone, Default)]
pub struct RecordingActionLogger {
    records: Arc<Mutex<Vec<LoggedRecord>>>,
}

impl RecordingActionLogger {
    pub fn records(&self) -> Vec<LoggedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ActionLogger for RecordingActionLogger {
    fn log(&self, level: LogLevel, payload: &Value, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LoggedRecord {
                level,
                payload: payload.clone(),
                message: message.to_owned(),
            });
    }
}
