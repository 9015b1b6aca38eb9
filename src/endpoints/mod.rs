//! Endpoint wrappers for the pricing API.
//!
//! Each wrapper borrows the SDK's [`ApiClient`](crate::client::ApiClient) and
//! exposes the operations of one endpoint, returning typed results.

pub mod results;
pub mod submit;
pub mod variants;

pub use results::ResultsEndpoint;
pub use submit::{NoProgress, ProgressObserver, ProgressPacing, SubmitEndpoint};
pub use variants::VariantsEndpoint;
