//! Message router for dispatching incoming messages to the explorer.
//!
//! [`MessageRouter`] receives protocol messages, runs the blocking listing
//! work off the async runtime and turns every failure into an
//! [`ErrorMessage`] reply carrying the request's sequence number.

use std::sync::Arc;

use protocol::messages::{Envelope, ErrorCode, ErrorMessage, ListingRequest, Message};
use protocol::ProtocolError;
use tracing::{debug, warn};

use crate::files::{ExplorerError, FileExplorer};

/// Result type for router operations.
pub type RouterResult = Result<Option<Message>, RouterError>;

/// Errors that can occur during message routing.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Listing failure.
    #[error("explorer error: {0}")]
    Explorer(#[from] ExplorerError),

    /// Envelope could not be decoded or has the wrong version.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RouterError {
    /// Convert the error to a protocol ErrorMessage.
    ///
    /// A rejected folder always yields the fixed permission-denied message
    /// with no context, so clients learn nothing about the filesystem.
    pub fn to_error_message(&self, context: Option<String>) -> ErrorMessage {
        let (code, recoverable) = match self {
            RouterError::Explorer(ExplorerError::PathRejected) => {
                return ErrorMessage::path_rejected();
            }
            RouterError::Explorer(_) => (ErrorCode::InternalError, false),
            RouterError::Protocol(ProtocolError::VersionMismatch { .. }) => {
                (ErrorCode::VersionMismatch, false)
            }
            RouterError::Protocol(_) => (ErrorCode::InvalidRequest, false),
            RouterError::InvalidRequest(_) => (ErrorCode::InvalidRequest, false),
            RouterError::Internal(_) => (ErrorCode::InternalError, true),
        };

        ErrorMessage {
            code,
            message: self.to_string(),
            context,
            recoverable,
        }
    }
}

/// Dispatches messages to a shared [`FileExplorer`].
#[derive(Debug, Clone)]
pub struct MessageRouter {
    explorer: Arc<FileExplorer>,
}

impl MessageRouter {
    /// Create a new message router over the given explorer.
    pub fn new(explorer: Arc<FileExplorer>) -> Self {
        Self { explorer }
    }

    /// The explorer requests are served from.
    pub fn explorer(&self) -> &FileExplorer {
        &self.explorer
    }

    /// Route a message to the appropriate handler.
    ///
    /// Returns `Ok(Some(response))` if the message produces a response,
    /// `Ok(None)` if it does not, or `Err` if handling failed.
    pub async fn route(&self, message: Message) -> RouterResult {
        match message {
            Message::ListingRequest(req) => self.handle_listing(req).await,
            Message::ListingResponse(_) => {
                debug!("Ignoring response message received as request");
                Ok(None)
            }
            Message::Error(err) => {
                warn!(?err, "Received error from peer");
                Ok(None)
            }
        }
    }

    /// Handle one envelope and build the reply envelope.
    ///
    /// Errors become an [`Message::Error`] reply with the request's sequence
    /// number. Returns `None` when the message needs no reply.
    pub async fn handle_envelope(&self, envelope: Envelope) -> Option<Envelope> {
        if let Err(e) = envelope.check_version() {
            warn!(sequence = envelope.sequence, error = %e, "Rejecting envelope");
            let err = RouterError::from(e).to_error_message(None);
            return Some(envelope.reply(Message::Error(err)));
        }

        let sequence = envelope.sequence;
        match self.route(envelope.payload).await {
            Ok(Some(payload)) => Some(Envelope::new(sequence, payload)),
            Ok(None) => None,
            Err(e) => {
                debug!(sequence, error = %e, "Request failed");
                Some(Envelope::new(
                    sequence,
                    Message::Error(e.to_error_message(None)),
                ))
            }
        }
    }

    /// Handle one JSON-encoded envelope and return the JSON reply, if any.
    ///
    /// A line that does not decode is answered with an `InvalidRequest`
    /// error on sequence 0.
    pub async fn handle_json_line(&self, line: &str) -> protocol::Result<Option<String>> {
        let reply = match Envelope::from_json(line) {
            Ok(envelope) => self.handle_envelope(envelope).await,
            Err(e) => {
                warn!(error = %e, "Discarding malformed envelope");
                let err = RouterError::from(e).to_error_message(None);
                Some(Envelope::new(0, Message::Error(err)))
            }
        };

        reply.map(|envelope| envelope.to_json()).transpose()
    }

    // =========================================================================
    // Listing Handlers
    // =========================================================================

    async fn handle_listing(&self, req: ListingRequest) -> RouterResult {
        debug!(folder = %req.folder, page = req.page, "Listing directory");

        let explorer = Arc::clone(&self.explorer);
        let listing = tokio::task::spawn_blocking(move || explorer.list(&req))
            .await
            .map_err(|e| RouterError::Internal(format!("listing task failed: {}", e)))??;

        Ok(Some(Message::ListingResponse(listing.to_response())))
    }
}
