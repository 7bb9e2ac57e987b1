//! Asynchronous fetch-and-extract with cancellation.
//!
//! The network client is a collaborator supplied by the caller through the
//! [`Fetcher`] trait. [`fetch_and_extract`] spawns a task that fetches the
//! page, then runs the synchronous pipeline on tokio's blocking pool.
//!
//! Cancellation is only honored while the fetch is in flight or right after
//! it completes. Once parsing has started the request runs to completion,
//! so a cancelled request never yields a partial document.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use crate::error::{FetchError, Result};
use crate::result::ReadableDoc;
use crate::Options;

/// A fetched page as handed over by the network collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects. Becomes the document's base URL.
    pub url: Url,
    /// Raw response body.
    pub bytes: Vec<u8>,
    /// Encoding label from the transport, e.g. the `Content-Type` charset.
    pub declared_encoding: Option<String>,
}

/// Network fetch collaborator.
///
/// Implementations own timeouts, redirects and status handling, and report
/// failures as [`FetchError`]. The error is passed to the caller untouched.
///
/// ```rust
/// use reeeed::fetch::{FetchedPage, Fetcher};
/// use reeeed::FetchError;
/// use url::Url;
///
/// struct Canned(&'static str);
///
/// impl Fetcher for Canned {
///     async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
///         Ok(FetchedPage {
///             url: url.clone(),
///             bytes: self.0.as_bytes().to_vec(),
///             declared_encoding: Some("utf-8".to_string()),
///         })
///     }
/// }
/// ```
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = std::result::Result<FetchedPage, FetchError>> + Send;
}

/// Cancels the request it was taken from. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    signal: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Request cancellation. Has no effect once parsing has started.
    pub fn cancel(&self) {
        self.signal.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }
}

/// An in-flight extraction started by [`fetch_and_extract`].
///
/// Dropping the request does not cancel it; the task runs on detached.
#[derive(Debug)]
pub struct ExtractRequest {
    url: Url,
    cancel: CancelHandle,
    task: JoinHandle<Option<Result<ReadableDoc>>>,
}

impl ExtractRequest {
    /// The URL this request was started for.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request cancellation. Same as [`CancelHandle::cancel`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A handle that can cancel this request from elsewhere.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Wait for the request to finish.
    ///
    /// `None` means the request was cancelled before parsing started.
    pub async fn outcome(self) -> Option<Result<ReadableDoc>> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => None,
        }
    }
}

/// Fetch `url` through `fetcher` and extract its readable content.
///
/// Must be called from within a tokio runtime.
pub fn fetch_and_extract<F: Fetcher>(fetcher: Arc<F>, url: Url, options: Options) -> ExtractRequest {
    let (signal, cancelled) = watch::channel(false);
    let cancel = CancelHandle { signal: Arc::new(signal) };
    let task = tokio::spawn(run(fetcher, url.clone(), options, cancelled));
    ExtractRequest { url, cancel, task }
}

async fn run<F: Fetcher>(
    fetcher: Arc<F>,
    url: Url,
    options: Options,
    mut cancelled: watch::Receiver<bool>,
) -> Option<Result<ReadableDoc>> {
    let fetched = tokio::select! {
        biased;
        () = wait_for_cancel(&mut cancelled) => {
            debug!(%url, "cancelled during fetch");
            return None;
        }
        fetched = fetcher.fetch(&url) => fetched,
    };

    // The fetch may have won the race against a cancel sent at the same time
    let cancelled_after_fetch = *cancelled.borrow();
    if cancelled_after_fetch {
        debug!(%url, "cancelled after fetch");
        return None;
    }

    let page = match fetched {
        Ok(page) => page,
        Err(err) => {
            debug!(%url, %err, "fetch failed");
            return Some(Err(err.into()));
        }
    };
    debug!(url = %page.url, bytes = page.bytes.len(), "fetched page");

    let extraction = tokio::task::spawn_blocking(move || {
        crate::extract_bytes(&page.bytes, page.declared_encoding.as_deref(), &page.url, &options)
    })
    .await;

    match extraction {
        Ok(result) => Some(result),
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(_) => None,
    }
}

/// Resolves once cancellation is requested; never, if it cannot be anymore.
async fn wait_for_cancel(cancelled: &mut watch::Receiver<bool>) {
    let sender_gone = cancelled.wait_for(|c| *c).await.is_err();
    if sender_gone {
        std::future::pending::<()>().await;
    }
}
