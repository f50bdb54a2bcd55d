//! A client for pulling artifact data out of a Sonatype Nexus v2.x instance.
//!
//! Nexus provides a REST API, but some answers take several calls and a few
//! workarounds to collate. This crate abstracts that plumbing away: the
//! centerpiece is [`Nexus2x::artifacts`], which turns any [`Criteria`], even
//! the unrestricted kind the server cannot answer in one search, into a
//! complete deduplicated listing.
//!
//! ```no_run
//! use arti_census::{Coordinates, Credentials, Criteria, Nexus2x};
//!
//! # async fn run() -> arti_census::Result<()> {
//! let nexus = Nexus2x::new("https://maven.java.net".to_string(), Credentials::None)?;
//!
//! // print every sources jar under javax.enterprise in a hosted repository
//! for repository in nexus.repositories().await? {
//!     if repository.kind != "hosted" {
//!         continue;
//!     }
//!
//!     let artifacts = nexus
//!         .artifacts(Criteria::InRepository {
//!             repository_id: repository.id,
//!             criteria: Box::new(Criteria::Coordinates(Coordinates {
//!                 group_id: Some("javax.enterprise*".to_string()),
//!                 classifier: Some("sources".to_string()),
//!                 ..Coordinates::default()
//!             })),
//!         })
//!         .await?;
//!
//!     for artifact in artifacts {
//!         println!("{artifact}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod client;
pub mod credentials;
pub mod error;
pub mod repository;
pub mod search;

mod util;

pub use artifact::Artifact;
pub use client::transport::{HttpTransport, ScriptedTransport, Transport};
pub use client::Nexus2x;
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use repository::Repository;
pub use search::{Coordinates, Criteria, Parameters};
