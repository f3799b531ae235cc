//! Response plumbing for HTTP/1.1 handlers whose status and headers are
//! decided by different layers.
//!
//! [`response::DeferredStatusWriter`] lets an outer caller propose a status,
//! lets an inner encoder adjust headers and override that status, and only
//! commits the status on the wrapped [`response::ResponseSink`] when the
//! body is first written.

#[macro_use]
extern crate lazy_static;

pub mod errors;
mod grammar;
pub mod headers;
mod helpers;
pub mod response;
pub mod status;

pub use errors::Error;
pub use headers::Headers;
pub use response::{DeferredStatusWriter, ResponseSink};
pub use status::StatusCode;
