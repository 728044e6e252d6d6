//! # Explorer Library
//!
//! Read-only, root-confined directory listings for remote clients.
//!
//! ## Overview
//!
//! - **Containment**: every requested folder must resolve inside one
//!   configured root directory
//! - **Patterns**: wildcard ignore lists with allow overrides, plus pinned
//!   root folders
//! - **Aliases**: display names for directories
//! - **Listing pipeline**: filter, sort, paginate and build a breadcrumb
//! - **Routing**: protocol envelopes in, listing or error envelopes out
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use explorer::protocol::messages::{ListingRequest, Message};
//! use explorer::{Config, FileExplorer, MessageRouter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!     let explorer = FileExplorer::from_config(&config)?;
//!     let router = MessageRouter::new(Arc::new(explorer));
//!
//!     let reply = router
//!         .route(Message::ListingRequest(ListingRequest::for_folder("docs")))
//!         .await?;
//!     println!("{:?}", reply);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and defaults
//! - [`files`]: Containment, patterns, scanning and the listing pipeline
//! - [`router`]: Message routing to the explorer

pub mod config;
pub mod files;
pub mod router;

// Re-export protocol for convenience
pub use protocol;

// Re-export config types for convenience
pub use config::{Config, ConfigError};

// Re-export files types for convenience
pub use files::{
    Aliases, Entry, ExplorerError, ExplorerRoot, FileExplorer, Listing, ListingLimits,
    ListingQuery, ListingResult, PatternLists, PatternSet, SortMode,
};

// Re-export router types for convenience
pub use router::{MessageRouter, RouterError, RouterResult};
