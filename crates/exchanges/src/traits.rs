//! Transport seam between the exchange clients and the network
//!
//! The clients only ever need two shapes of request: a public GET whose
//! parameters live in the query string, and an authenticated POST whose
//! payload lives entirely in headers. Status handling stays with the
//! clients; a transport returns whatever the server said.

use crate::errors::Result;
use crate::http::HttpResponse;
use async_trait::async_trait;
use std::rc::Rc;
use url::Url;

/// Request/response transport used by the market-data and trading clients
#[async_trait(?Send)]
pub trait Transport {
    /// GET `url` (query string already attached)
    async fn get(&self, url: &Url) -> Result<HttpResponse>;

    /// POST to `url` with an empty body and the given extra headers
    async fn post(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Rc<T> {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        (**self).get(url).await
    }

    async fn post(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        (**self).post(url, headers).await
    }
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        (**self).get(url).await
    }

    async fn post(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        (**self).post(url, headers).await
    }
}
