//! External system integrations.
//!
//! Adapters isolate the pipeline from the outside world:
//!
//! - [`api`] - Karya backend REST endpoints (preview, dataset)
//! - [`assets`] - generic HTTP GET for remote asset URLs
//! - [`renderer`] - the document-rendering collaborator boundary
//!
//! Each adapter exposes a trait so the pipeline can run against fakes in
//! tests; the HTTP/PDF implementations live next to their traits.

pub mod api;
pub mod assets;
pub mod renderer;
