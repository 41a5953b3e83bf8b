//! Vasílala - Gateway Client
//!
//! HTTP implementation of the gateway traits the domain stores consume:
//! document CRUD with filtered queries and cursor pagination, atomic field
//! operations, binary object upload with progress, and identity with
//! automatic token refresh.
//!
//! The hosted backend owns all durable state; this crate is a thin,
//! well-typed client over its REST surface. A single [`GatewayClient`]
//! implements [`vasilala_core::DocumentGateway`],
//! [`vasilala_core::ObjectStore`], and [`vasilala_core::IdentityGateway`].
//!
//! # Example
//!
//! ```ignore
//! use vasilala_gateway::{ClientConfig, GatewayClient};
//!
//! let config = ClientConfig::load()?;
//! let client = GatewayClient::from_client_config(&config)?;
//!
//! let session = client.sign_in("ana@example.com", "secret").await?;
//! println!("signed in as {}", session.profile.display_name);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod documents;
mod error;
mod identity;
mod objects;

pub use client::GatewayClient;
pub use config::{ClientConfig, GatewayConfig};
pub use error::{GatewayError, Result};
