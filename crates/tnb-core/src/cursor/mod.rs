//! # Paged cursor
//!
//! Lazily walks a paginated list endpoint, decoding each page through a
//! spec tree and handing out typed items one at a time, in either
//! direction.
//!
//! A call that has to fetch awaits the [`JsonClient`] and then decodes the
//! whole page. Buffer, position and links are only replaced after both
//! succeed, so a failed or cancelled call never skips an item and can simply
//! be repeated.

mod envelope;
mod state;

use std::sync::Arc;

use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::client::{ClientError, JsonClient};
use crate::context::ConversionContext;
use crate::schema::{SchemaError, Spec};

pub use envelope::PageEnvelope;
pub use state::{CursorState, Direction};

use state::{Buffer, FetchTarget, Page, Step};

#[derive(Debug, Error)]
pub enum CursorError {
    /// No more items in the requested direction. Not a failure.
    #[error("cursor is exhausted")]
    Exhausted,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("page could not be decoded: {0}")]
    Decode(#[from] SchemaError),
}

impl CursorError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// Traversal bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorConfig {
    /// Items handed out in total, counting both directions.
    pub limit: Option<usize>,
    /// Page size requested from the server.
    pub page_size: Option<usize>,
    /// Treat a page shorter than `page_size` as the last one, even when it
    /// carries a `next` link.
    pub short_page_terminal: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            limit: None,
            page_size: None,
            short_page_terminal: true,
        }
    }
}

impl CursorConfig {
    pub fn with_limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.limit = limit.into();
        self
    }

    pub fn with_page_size(mut self, page_size: impl Into<Option<usize>>) -> Self {
        self.page_size = page_size.into();
        self
    }

    pub fn with_short_page_terminal(mut self, enabled: bool) -> Self {
        self.short_page_terminal = enabled;
        self
    }
}

pub struct Cursor<T> {
    client: Arc<dyn JsonClient>,
    url: String,
    query: Vec<(String, String)>,
    envelope: Spec,
    ctx: ConversionContext,
    config: CursorConfig,
    buffer: Buffer<T>,
    consumed: usize,
    total_count: Option<u64>,
}

impl<T> Cursor<T>
where
    T: DeserializeOwned + Clone,
{
    /// Cursor over `url` whose results are checked and converted by `item`.
    pub fn new(
        client: Arc<dyn JsonClient>,
        url: impl Into<String>,
        item: &Spec,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            client,
            url: url.into(),
            query: Vec::new(),
            envelope: PageEnvelope::<T>::spec(item)?,
            ctx: ConversionContext::new(),
            config: CursorConfig::default(),
            buffer: Buffer::default(),
            consumed: 0,
            total_count: None,
        })
    }

    /// Query parameters for the first request. Later pages use the links
    /// returned by the server, which already carry them.
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    pub fn with_context(mut self, ctx: ConversionContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn with_config(mut self, config: CursorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    pub fn state(&self) -> CursorState {
        self.buffer.state()
    }

    /// Items handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Items left before the limit; `None` without a limit.
    pub fn remaining(&self) -> Option<usize> {
        self.config
            .limit
            .map(|limit| limit.saturating_sub(self.consumed))
    }

    /// `count` reported by the most recent page.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn next_link(&self) -> Option<&str> {
        self.buffer.page().and_then(|page| page.next.as_deref())
    }

    pub fn previous_link(&self) -> Option<&str> {
        self.buffer.page().and_then(|page| page.previous.as_deref())
    }

    pub async fn next(&mut self) -> Result<T, CursorError> {
        self.step(Direction::Forward).await
    }

    pub async fn previous(&mut self) -> Result<T, CursorError> {
        self.step(Direction::Backward).await
    }

    /// [`Cursor::next`] with exhaustion mapped to `None`.
    pub async fn try_next(&mut self) -> Result<Option<T>, CursorError> {
        match self.next().await {
            Ok(item) => Ok(Some(item)),
            Err(CursorError::Exhausted) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Drains every remaining item in forward order.
    pub async fn flatten(&mut self) -> Result<Vec<T>, CursorError> {
        let mut items = Vec::new();
        while let Some(item) = self.try_next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// First remaining item matching `predicate`, consuming up to and including it.
    pub async fn find<P>(&mut self, mut predicate: P) -> Result<Option<T>, CursorError>
    where
        P: FnMut(&T) -> bool,
    {
        while let Some(item) = self.try_next().await? {
            if predicate(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    /// Forward stream of items. Ends after exhaustion or after yielding an error.
    pub fn into_stream(self) -> impl Stream<Item = Result<T, CursorError>> {
        stream::unfold(Some(self), |cursor| async move {
            let mut cursor = cursor?;
            match cursor.next().await {
                Ok(item) => Some((Ok(item), Some(cursor))),
                Err(CursorError::Exhausted) => None,
                Err(error) => Some((Err(error), None)),
            }
        })
    }

    fn limit_reached(&self) -> bool {
        self.config
            .limit
            .is_some_and(|limit| self.consumed >= limit)
    }

    /// Pages that come back empty but still link onwards are skipped, so
    /// `Exhausted` always means the server has nothing more in `direction`.
    async fn step(&mut self, direction: Direction) -> Result<T, CursorError> {
        let mut followed: Option<FetchTarget> = None;
        loop {
            let target = match self.buffer.plan(direction, self.limit_reached()) {
                Step::Yield => return self.yield_item(direction),
                Step::Exhausted => return self.exhausted(direction),
                Step::Fetch(target) => target,
            };
            if followed.as_ref() == Some(&target) {
                debug!(?target, "page links back to itself");
                return self.exhausted(direction);
            }

            let page = self.fetch_page(target.clone()).await?;
            self.buffer.replace(page, direction);
            followed = Some(target);
        }
    }

    fn yield_item(&mut self, direction: Direction) -> Result<T, CursorError> {
        let item = self
            .buffer
            .take(direction)
            .ok_or(CursorError::Exhausted)?;
        self.consumed += 1;
        Ok(item)
    }

    fn exhausted(&mut self, direction: Direction) -> Result<T, CursorError> {
        self.buffer.exhaust(direction);
        Err(CursorError::Exhausted)
    }

    async fn fetch_page(&mut self, target: FetchTarget) -> Result<Page<T>, CursorError> {
        let raw = match &target {
            FetchTarget::Initial => {
                debug!(url = %self.url, "fetching first page");
                self.client.fetch_json(&self.url, &self.query).await?
            }
            FetchTarget::Link(link) => {
                debug!(url = %link, "following page link");
                self.client.fetch_json(link, &[]).await?
            }
        };

        let envelope: PageEnvelope<T> = self.envelope.decode_in(&self.ctx, &raw)?;
        let short = self.config.short_page_terminal
            && self
                .config
                .page_size
                .is_some_and(|size| envelope.results.len() < size);
        debug!(
            items = envelope.results.len(),
            count = envelope.count,
            has_next = envelope.next.is_some(),
            short,
            "decoded page"
        );

        self.total_count = Some(envelope.count);
        Ok(Page {
            last: short || envelope.next.is_none(),
            items: envelope.results,
            next: envelope.next,
            previous: envelope.previous,
        })
    }
}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("url", &self.url)
            .field("state", &self.buffer.state())
            .field("consumed", &self.consumed)
            .field("config", &self.config)
            .finish()
    }
}
