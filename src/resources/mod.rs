//! Resource records and their request descriptors
//!
//! - [`image`] - images (list is paginated)
//! - [`floating_ip_action`] - assign/unassign actions on floating IPs
//! - [`region`] - region record embedded in other resources
//!
//! # Example
//!
//! ```ignore
//! use doapi::resources::image::{ImageFilter, ListImages};
//!
//! async fn distributions(client: &doapi::Client) -> anyhow::Result<usize> {
//!     let pages = client.request_all(&ListImages::new().filter(ImageFilter::Distribution)).await?;
//!     Ok(pages.iter().map(|p| p.images.len()).sum())
//! }
//! ```

pub mod floating_ip_action;
pub mod image;
pub mod region;
