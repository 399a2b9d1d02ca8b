//! Socrata open-data adapter
//!
//! Paginated retrieval of flat permit records from a Socrata resource
//! endpoint, behind the [`PermitSource`] trait.

pub mod client;
pub mod source;

pub use client::SocrataClient;
pub use source::PermitSource;
