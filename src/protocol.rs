use crate::command::Interpretation;
use crate::dashboard::StateReport;
use crate::notifications::{Notification, NotificationSummary, NOTIFICATION_CAPACITY};
use crate::session::VoiceLogEntry;
use arrayvec::ArrayString;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const MAX_REQUEST_SIZE: usize = 512;
pub const MAX_RESPONSE_SIZE: usize = 64 * 1024;
/// Response id used for unsolicited state broadcasts.
pub const BROADCAST_ID: u32 = 0;
/// Most voice log entries returned by one `GetVoiceLog` request.
pub const VOICE_LOG_PAGE_LIMIT: usize = 200;

pub type RequestBuffer = ArrayString<MAX_REQUEST_SIZE>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u32,
    pub kind: RequestKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestKind {
    Ping,
    GetState,
    GetNotifications { limit: usize },
    NotificationSummary { shown: usize },
    GetVoiceLog { limit: usize },
    Interpret { text: String },
    SelectPanel { panel: String },
    ToggleTheme,
    ToggleEmergency,
    MarkNotificationRead { id: Uuid },
    MarkAllRead,
    ForceRefresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Success,
    NotFound,
    InvalidRequest,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResponsePayload {
    State(Box<StateReport>),
    Notifications(Vec<Notification>),
    Summary(NotificationSummary),
    Interpretation(Interpretation),
    VoiceLog(Vec<VoiceLogEntry>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    pub status: ResponseStatus,
    pub message: Option<String>,
    pub payload: Option<ResponsePayload>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Invalid JSON format")]
    InvalidJson,
    #[error("Message exceeds buffer size")]
    MessageTooLarge,
    #[error("Serialization failed")]
    SerializationError,
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Line-delimited JSON framing for dashboard requests and responses.
#[derive(Debug, Default)]
pub struct ProtocolHandler {
    request_buffer: RequestBuffer,
    requests_parsed: u32,
}

impl ProtocolHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_request(&mut self, line: &str) -> Result<Request, ProtocolError> {
        self.request_buffer.clear();
        self.request_buffer
            .try_push_str(line.trim())
            .map_err(|_| ProtocolError::MessageTooLarge)?;

        let request = serde_json::from_str::<Request>(&self.request_buffer)
            .map_err(|_| ProtocolError::InvalidJson)?;
        self.requests_parsed = self.requests_parsed.wrapping_add(1);
        Ok(request)
    }

    pub fn validate_request(&self, request: &Request) -> Result<(), ProtocolError> {
        if request.id == BROADCAST_ID {
            return Err(ProtocolError::InvalidRequest);
        }

        match &request.kind {
            RequestKind::GetNotifications { limit } if *limit > NOTIFICATION_CAPACITY => {
                Err(ProtocolError::InvalidParameter("limit exceeds notification capacity"))
            }
            RequestKind::NotificationSummary { shown } if *shown > NOTIFICATION_CAPACITY => {
                Err(ProtocolError::InvalidParameter("shown exceeds notification capacity"))
            }
            RequestKind::GetVoiceLog { limit } if *limit > VOICE_LOG_PAGE_LIMIT => {
                Err(ProtocolError::InvalidParameter("limit exceeds voice log page size"))
            }
            RequestKind::Interpret { text } if text.trim().is_empty() => {
                Err(ProtocolError::InvalidParameter("command text is empty"))
            }
            RequestKind::SelectPanel { panel } if panel.trim().is_empty() => {
                Err(ProtocolError::InvalidParameter("panel name is empty"))
            }
            _ => Ok(()),
        }
    }

    pub fn serialize_response(&self, response: &Response) -> Result<String, ProtocolError> {
        let json = serde_json::to_string(response).map_err(|_| ProtocolError::SerializationError)?;
        if json.len() > MAX_RESPONSE_SIZE {
            return Err(ProtocolError::MessageTooLarge);
        }
        Ok(json)
    }

    pub fn create_response(
        &self,
        id: u32,
        status: ResponseStatus,
        message: Option<&str>,
        payload: Option<ResponsePayload>,
        now: DateTime<Utc>,
    ) -> Response {
        Response {
            id,
            timestamp: now,
            status,
            message: message.map(Into::into),
            payload,
        }
    }

    pub fn create_error_response(&self, id: u32, error: &ProtocolError, now: DateTime<Utc>) -> Response {
        let status = match error {
            ProtocolError::SerializationError => ResponseStatus::Error,
            _ => ResponseStatus::InvalidRequest,
        };
        self.create_response(id, status, Some(&error.to_string()), None, now)
    }

    pub fn create_broadcast(&self, report: StateReport, now: DateTime<Utc>) -> Response {
        self.create_response(
            BROADCAST_ID,
            ResponseStatus::Success,
            Some("refresh"),
            Some(ResponsePayload::State(Box::new(report))),
            now,
        )
    }

    pub fn requests_parsed(&self) -> u32 {
        self.requests_parsed
    }
}
