//! # Razorgator Pearl Client
//!
//! An async Rust client library for the Razorgator "Pearl" order web service.
//!
//! The service exposes the order lifecycle of a ticket broker (listing,
//! accepting, shipping and rejecting orders, and fetching airbills and
//! purchase orders) as XML over HTTP.
//!
//! ## Features
//!
//! - **Typed records**: order lists are parsed into a [`ResultSet`] of
//!   [`Record`]s whose attributes are converted to integers, floats and
//!   booleans by field name
//! - **Seekable results**: a result set has a cursor with absolute seek,
//!   plus plain slice access and iterators
//! - **Filtering**: drop records by brokerage, office or any field
//! - **Raw XML mode**: opt out of result sets and get the parsed document
//! - **Pluggable transport**: requests go through the [`Transport`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use razorgator::{ExcludeBy, Options, RazorgatorClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RazorgatorClient::new("your_api_token")?;
//!
//!     let response = client.list_orders(Options::new()).await?;
//!     if let Some(mut orders) = response.into_result_set() {
//!         orders.exclude_results([12, 15], ExcludeBy::Office);
//!         for order in &orders {
//!             println!("{:?} x{:?}", order.order_id(), order.quantity());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! Every request carries the broker's API token. Log in to Pearl and open
//! `AboutApi.aspx` to find it.

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod result_set;
pub mod transport;
pub mod types;
pub mod xml;

pub use client::{Endpoint, RazorgatorClient, RazorgatorConfig};
pub use error::{RazorgatorError, Result};
pub use request::{prepare_options, Options};
pub use response::{classify, ApiResponse};
pub use result_set::{ExcludeBy, ResultSet};
pub use transport::{ReqwestTransport, Transport, TransportConfig, TransportRequest, TransportResponse};
pub use types::{FieldKind, FieldValue, Record, ResultType};
pub use xml::{XmlDocument, XmlElement};

/// Re-export of the body type returned by document downloads
pub use bytes::Bytes;

/// The default base URI of the Pearl web service
pub const DEFAULT_BASE_URI: &str = "https://pearl.razorgator.com";

/// Default web service version
pub const DEFAULT_API_VERSION: &str = "1";

/// Default user agent string for requests
pub const DEFAULT_USER_AGENT: &str = concat!("razorgator-rs/", env!("CARGO_PKG_VERSION"));
