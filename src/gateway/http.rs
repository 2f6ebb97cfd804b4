//! REST implementation of [`ResourceGateway`].
//!
//! # Security Note - Logging
//!
//! The bearer token is held in a [`SecretString`] and only exposed when the
//! `Authorization` header is built. `Debug` output of the gateway redacts it.
//! Request logging at `debug` level records the method and URL, never headers.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{ApiError, transport_error};
use super::{MutationIntent, MutationOutcome, ResourceGateway, collect_pages, ensure_supported};
use crate::config::Config;
use crate::error::{KeepsakeError, Result};
use crate::media::MediaResolver;
use crate::model::Record;
use crate::query::{QuerySpec, ResourcePage};
use crate::types::{ApiPath, ListMode, RecordId};

/// Total request timeout used when the config does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// List responses come either bare or wrapped in an envelope with a total.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Envelope {
        #[serde(
            alias = "data",
            alias = "results",
            alias = "users",
            alias = "families",
            alias = "kids",
            alias = "albums",
            alias = "photos",
            alias = "videos",
            alias = "milestones"
        )]
        items: Vec<T>,
        #[serde(default, alias = "total_count", alias = "count")]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    fn into_parts(self) -> (Vec<T>, Option<u64>) {
        match self {
            ListBody::Envelope { items, total } => (items, total),
            ListBody::Bare(items) => (items, None),
        }
    }
}

/// Single-record responses, bare or under `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemBody<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemBody<T> {
    fn into_inner(self) -> T {
        match self {
            ItemBody::Wrapped { data } => data,
            ItemBody::Bare(item) => item,
        }
    }
}

/// Decode a single record, tolerating the `data` envelope.
pub(crate) fn decode_item<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str::<ItemBody<T>>(body)
        .map(ItemBody::into_inner)
        .map_err(KeepsakeError::unexpected_shape)
}

/// Decode a list response into its items and optional total.
pub(crate) fn decode_list<T: DeserializeOwned>(body: &str) -> Result<(Vec<T>, Option<u64>)> {
    serde_json::from_str::<ListBody<T>>(body)
        .map(ListBody::into_parts)
        .map_err(KeepsakeError::unexpected_shape)
}

pub struct HttpGateway {
    client: Client,
    base: Url,
    token: Option<SecretString>,
    media: MediaResolver,
}

impl fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base", &self.base.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("media", &self.media.origin().as_str())
            .finish()
    }
}

impl HttpGateway {
    pub fn new(base_url: &str, media: MediaResolver) -> Result<Self> {
        Self::with_timeout(base_url, media, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, media: MediaResolver, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| KeepsakeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            token: None,
            media,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Build a gateway from the resolved configuration (env overrides included).
    pub fn from_config(config: &Config) -> Result<Self> {
        let media = MediaResolver::new(&config.media_base_url()?)?;
        let mut gateway = Self::with_timeout(&config.api_base_url(), media, config.request_timeout())?;
        gateway.token = config.auth_token();
        Ok(gateway)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn media(&self) -> &MediaResolver {
        &self.media
    }

    /// Absolute URL of `path`. Each segment is percent-encoded on its own.
    pub(crate) fn endpoint(&self, path: &ApiPath) -> Result<Url> {
        if let Some(segment) = path
            .segments()
            .iter()
            .find(|segment| matches!(segment.as_str(), "" | "." | ".."))
        {
            return Err(KeepsakeError::Other(format!(
                "invalid path segment '{segment}' in '{path}'"
            )));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| KeepsakeError::Config(format!("invalid API base URL '{}'", self.base)))?
            .pop_if_empty()
            .extend(path.segments());
        Ok(url)
    }

    /// Start a request against `path`, authenticated when a token is set.
    pub(crate) fn request(
        &self,
        method: Method,
        path: impl Into<ApiPath>,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint(&path.into())?;
        tracing::debug!("{method} {url}");
        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Send the request and return the body of a 2xx response.
    pub(crate) async fn send_text(&self, builder: RequestBuilder) -> Result<String> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            let error = ApiError::from_response(status, &body);
            tracing::debug!("request failed: {error}");
            return Err(error.into());
        }
        Ok(body)
    }

    pub(crate) async fn send_item<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let body = self.send_text(builder).await?;
        decode_item(&body)
    }

    pub(crate) async fn send_list<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<(Vec<T>, Option<u64>)> {
        let body = self.send_text(builder).await?;
        decode_list(&body)
    }

    /// Send a write and interpret the echoed record, if any.
    pub(crate) async fn send_mutation<R: Record>(
        &self,
        builder: RequestBuilder,
        target: Option<RecordId>,
    ) -> Result<MutationOutcome<R>> {
        let body = self.send_text(builder).await?;
        if body.trim().is_empty() {
            return Ok(MutationOutcome::Accepted(target));
        }
        match decode_item::<R>(&body) {
            Ok(mut record) => {
                record.resolve_media(&self.media);
                Ok(MutationOutcome::Saved(record))
            }
            Err(e) => {
                tracing::debug!("{} write returned no record: {e}", R::KIND.singular());
                Ok(MutationOutcome::Accepted(target))
            }
        }
    }
}

impl HttpGateway {
    /// GET a collection with the query parameters of `spec` for `mode`.
    async fn list<R: Record>(
        &self,
        spec: &QuerySpec,
        mode: ListMode,
    ) -> Result<(Vec<R>, Option<u64>)> {
        let builder = self
            .request(Method::GET, R::KIND.collection_path())?
            .query(&spec.params(mode));
        let (mut items, total) = self.send_list::<R>(builder).await?;
        for item in &mut items {
            item.resolve_media(&self.media);
        }
        Ok((items, total))
    }
}

impl ResourceGateway for HttpGateway {
    async fn fetch_page<R: Record>(&self, spec: &QuerySpec) -> Result<ResourcePage<R>> {
        let kind = R::KIND;
        kind.validate_page_size(spec.page_size)?;
        let mode = kind.capabilities().list;
        let (items, total) = self.list::<R>(spec, mode).await?;

        match mode {
            ListMode::Full => ResourcePage::from_full(items, spec.page, spec.page_size),
            ListMode::Paged | ListMode::Offset => match total {
                Some(total) => ResourcePage::new(items, total, spec.page, spec.page_size),
                None => ResourcePage::without_total(items, spec.page, spec.page_size),
            },
        }
    }

    async fn fetch_all<R: Record>(&self, spec: &QuerySpec) -> Result<Vec<R>> {
        match R::KIND.capabilities().list {
            ListMode::Full => Ok(self.list::<R>(spec, ListMode::Full).await?.0),
            ListMode::Paged | ListMode::Offset => collect_pages(self, spec).await,
        }
    }

    async fn fetch_one<R: Record>(&self, id: &RecordId) -> Result<R> {
        let builder = self.request(Method::GET, R::KIND.item_path(id))?;
        let mut record: R = self.send_item(builder).await.map_err(|e| match e {
            KeepsakeError::NotFound(_) => {
                KeepsakeError::NotFound(format!("{} '{id}'", R::KIND.singular()))
            }
            other => other,
        })?;
        record.resolve_media(&self.media);
        Ok(record)
    }

    async fn mutate<R: Record>(
        &self,
        intent: MutationIntent<R::Payload>,
    ) -> Result<MutationOutcome<R>> {
        let kind = R::KIND;
        ensure_supported(kind, &intent)?;

        match intent {
            MutationIntent::Create(payload) => {
                let builder = self.request(Method::POST, kind.create_path())?.json(&payload);
                self.send_mutation(builder, None).await
            }
            MutationIntent::Update(id, payload) => {
                let builder = self
                    .request(Method::PUT, kind.update_path(&id))?
                    .json(&payload);
                self.send_mutation(builder, Some(id)).await
            }
            MutationIntent::Delete(id) => {
                let builder = self.request(Method::DELETE, kind.item_path(&id))?;
                self.send_text(builder).await?;
                Ok(MutationOutcome::Deleted(id))
            }
        }
    }
}
