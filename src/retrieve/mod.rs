pub mod error;
pub mod http_retriever;
pub mod parameters;

use crate::retrieve::error::RetrieveError;
use crate::retrieve::parameters::RetrieveParameters;
use std::future::Future;
use std::path::Path;

/// Performs one retrieval and writes the result to `target`.
///
/// Implementations either leave a complete file at `target` and return `Ok`,
/// or return an error. The response content is never inspected by the caller.
pub trait Retrieve {
    fn retrieve(
        &self,
        dataset: &str,
        parameters: &RetrieveParameters,
        target: &Path,
    ) -> impl Future<Output = Result<(), RetrieveError>> + Send;
}
