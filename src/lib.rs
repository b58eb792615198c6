//! Typed async client for the DigitalOcean v2 API
//!
//! # Module Structure
//!
//! - [`client`] - request dispatch and pagination
//! - [`request`] - request descriptor traits and the [`Null`] sentinel
//! - [`error`] - error taxonomy
//! - [`date`] - timestamp codec shared by all records
//! - [`resources`] - concrete resources
//! - [`config`] - persisted configuration
//! - [`logging`] - optional file logging
//!
//! # Example
//!
//! ```ignore
//! use doapi::resources::image::GetImage;
//!
//! async fn example() -> Result<(), doapi::DoError> {
//!     let client = doapi::Client::new("dop_v1_...")?;
//!     let image = client.request(&GetImage { id: 7555620 }).await?.image;
//!     println!("{} ({} GiB)", image.name, image.size_in_gib);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod logging;
pub mod request;
pub mod resources;

pub use client::Client;
pub use config::Config;
pub use error::{DoError, PagedError, RemoteError};
pub use request::{Links, Meta, Method, Null, PagedRequest, PagedResponse, Pages, Query, Request};
