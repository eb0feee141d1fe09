use crate::retrieve::error::RetrieveError;
use crate::retrieve::parameters::RetrieveParameters;
use crate::retrieve::Retrieve;
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::task;
use tokio_util::io::StreamReader;

/// Retrieves data over HTTP from a service that answers a request with the file itself.
///
/// Each retrieval POSTs the parameters as JSON to `<endpoint>/<dataset>` and
/// streams the response body to disk. The body is first written to a temporary
/// file next to the target and only moved into place once complete, so a
/// failed retrieval never leaves a file at the target path.
///
/// Credentials and job polling are left to the service behind the endpoint
/// (for example an authenticating proxy in front of the Climate Data Store).
pub struct HttpRetriever {
    client: Client,
    endpoint: String,
}

impl HttpRetriever {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    /// Uses a preconfigured client, e.g. one with timeouts or default headers.
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn url(&self, dataset: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), dataset)
    }
}

impl Retrieve for HttpRetriever {
    async fn retrieve(
        &self,
        dataset: &str,
        parameters: &RetrieveParameters,
        target: &Path,
    ) -> Result<(), RetrieveError> {
        let url = self.url(dataset);
        info!("Requesting {} into {}", url, target.display());

        let response = self
            .client
            .post(&url)
            .json(parameters)
            .send()
            .await
            .map_err(|e| RetrieveError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    RetrieveError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    RetrieveError::NetworkRequest(url, e)
                });
            }
        };

        let directory = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let io_error = |e: io::Error| RetrieveError::Io(target.to_path_buf(), e);
        let temp_file = NamedTempFile::new_in(&directory).map_err(io_error)?;
        let mut file = tokio::fs::File::from_std(temp_file.reopen().map_err(io_error)?);

        let stream = response.bytes_stream().map_err(io::Error::other);
        let reader = StreamReader::new(stream);
        tokio::pin!(reader);
        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| RetrieveError::Stream(url.clone(), e))?;
        file.flush().await.map_err(io_error)?;
        file.sync_all().await.map_err(io_error)?;
        drop(file);

        let target_owned = target.to_path_buf();
        task::spawn_blocking(move || temp_file.persist(&target_owned).map(|_| ()))
            .await
            .map_err(|e| RetrieveError::Other(format!("background task failed: {e}")))?
            .map_err(|e| RetrieveError::Persist(target.to_path_buf(), e.error))?;

        info!("Received {} bytes from {}", written, url);
        Ok(())
    }
}
