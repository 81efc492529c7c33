//! Landing-page fetching.
//!
//! - `resolver`: one GET per call, protocol redirects followed by the transport, HTML
//!   bodies scanned for client-side redirects
//! - `recheck`: delayed re-resolution for links landing on configured hosts
//! - `context`: shared resources handed to link tasks

mod context;
mod recheck;
mod request;
mod resolver;

pub use context::ProcessingContext;
pub use recheck::resolve_with_recheck;
pub use resolver::{HttpResolver, ResolveOnce};
