//! HTTP access to the bibliographic metadata service.
use serde::de::DeserializeOwned;

pub mod cross_ref;

pub use cross_ref::{Candidate, CrossRef, Works, WorksQuery};

use crate::{Error, ErrorKind};

/// Minimal blocking HTTP client used to query the metadata service.
///
/// This is the seam used to swap the network out in tests.
pub trait Client {
    /// Perform a `GET` request and deserialize the JSON body.
    ///
    /// # Errors
    /// [`ErrorKind::IO`] when the request fails or the service answers with an error status,
    /// [`ErrorKind::Deserialize`] when the body is not the expected JSON.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap(ErrorKind::IO, e))
            .and_then(|r| r.json().map_err(|e| Error::wrap(ErrorKind::Deserialize, e)))
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_producer, request_count, works_page, MockClient, NetworkErrorProducer,
    Producer, URL_SINK,
};
