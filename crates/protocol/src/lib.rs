//! # Explorer Protocol Library
//!
//! Message definitions shared by the explorer service and its clients.
//!
//! ## Overview
//!
//! - **Listing messages**: [`ListingRequest`] in, [`ListingResponse`] or
//!   [`ErrorMessage`] out
//! - **Envelope**: versioned, sequenced wrapper with JSON and MessagePack
//!   encodings
//!
//! ## Example Usage
//!
//! ```rust
//! use protocol::{Envelope, Message};
//! use protocol::messages::ListingRequest;
//!
//! let request = Message::ListingRequest(ListingRequest::for_folder("docs"));
//! let envelope = Envelope::new(1, request);
//!
//! let line = envelope.to_json().unwrap();
//! assert_eq!(Envelope::from_json(&line).unwrap(), envelope);
//! ```
//!
//! ## Modules
//!
//! - [`messages`]: Protocol message definitions
//! - [`error`]: Error types

pub mod error;
pub mod messages;

pub use error::{ProtocolError, Result};
pub use messages::{
    Breadcrumb, EntryKind, EntryView, Envelope, ErrorCode, ErrorMessage, ListingRequest,
    ListingResponse, Message, DEFAULT_PAGE_SIZE, DEFAULT_SORT, PATH_REJECTED_MESSAGE,
    PROTOCOL_VERSION,
};
