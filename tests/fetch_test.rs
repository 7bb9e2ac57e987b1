use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reeeed::fetch::{fetch_and_extract, FetchedPage, Fetcher};
use reeeed::{Error, FetchError, Options, Url};
use tokio::sync::Notify;

const ARTICLE: &str = r#"<html><head><title>Harbour Seals Counted | Coast Notes</title></head><body>
<nav><a href="/">Home</a> <a href="/archive">Archive</a></nav>
<article>
<p>Volunteers counted more than four hundred harbour seals along the estuary this spring, the highest number since the survey began in 1998.</p>
<p>The count took place over two low tides, with teams spread across sandbanks, mud flats, and the old pier, each equipped with binoculars and tally sheets.</p>
<p>Researchers say cleaner water and fewer disturbances from boats have both helped, although they warn that a single year is not yet a trend.</p>
</article>
</body></html>"#;

fn url() -> Url {
    Url::parse("https://coast.example.net/notes/seals").unwrap()
}

struct Canned {
    bytes: Vec<u8>,
    encoding: Option<&'static str>,
}

impl Fetcher for Canned {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        Ok(FetchedPage {
            url: url.clone(),
            bytes: self.bytes.clone(),
            declared_encoding: self.encoding.map(str::to_string),
        })
    }
}

struct Failing;

impl Fetcher for Failing {
    async fn fetch(&self, _url: &Url) -> Result<FetchedPage, FetchError> {
        Err(FetchError::Status(404))
    }
}

/// Holds the fetch until released, counting how many fetches started.
struct Gated {
    release: Notify,
    started: AtomicUsize,
}

impl Fetcher for Gated {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(FetchedPage {
            url: url.clone(),
            bytes: ARTICLE.as_bytes().to_vec(),
            declared_encoding: None,
        })
    }
}

#[tokio::test]
async fn fetched_page_is_extracted() {
    let fetcher = Arc::new(Canned { bytes: ARTICLE.as_bytes().to_vec(), encoding: Some("utf-8") });
    let request = fetch_and_extract(fetcher, url(), Options::default());
    assert_eq!(request.url(), &url());

    let doc = request.outcome().await.expect("not cancelled").expect("extracted");
    assert_eq!(doc.title(), "Harbour Seals Counted");
    assert!(doc.content_text().contains("four hundred harbour seals"));
    assert!(!doc.content_text().contains("Archive"));
    assert_eq!(doc.url(), &url());
}

#[tokio::test]
async fn cancel_during_fetch_yields_nothing() {
    let fetcher = Arc::new(Gated { release: Notify::new(), started: AtomicUsize::new(0) });
    let request = fetch_and_extract(Arc::clone(&fetcher), url(), Options::default());

    while fetcher.started.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    request.cancel();
    fetcher.release.notify_one();

    let outcome = tokio::time::timeout(Duration::from_secs(5), request.outcome())
        .await
        .expect("cancelled request finishes");
    assert!(outcome.is_none());
}

#[tokio::test]
async fn cancel_before_fetch_yields_nothing() {
    let fetcher = Arc::new(Canned { bytes: ARTICLE.as_bytes().to_vec(), encoding: None });
    let request = fetch_and_extract(fetcher, url(), Options::default());
    let handle = request.cancel_handle();
    handle.cancel();
    assert!(request.outcome().await.is_none());
}

#[tokio::test]
async fn fetch_error_is_passed_through() {
    let request = fetch_and_extract(Arc::new(Failing), url(), Options::default());
    let outcome = request.outcome().await.expect("not cancelled");
    assert!(matches!(outcome, Err(Error::FetchError(FetchError::Status(404)))));
}

#[tokio::test]
async fn declared_encoding_is_honored() {
    let html = ARTICLE.replace("Volunteers counted", "Volunteers in Malmö counted");
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&html);
    let fetcher = Arc::new(Canned { bytes: bytes.into_owned(), encoding: Some("windows-1252") });

    let doc = fetch_and_extract(fetcher, url(), Options::default())
        .outcome()
        .await
        .expect("not cancelled")
        .expect("extracted");
    assert!(doc.content_text().contains("Volunteers in Malmö counted"));
}

#[tokio::test]
async fn empty_page_is_no_content() {
    let fetcher = Arc::new(Canned { bytes: b"<html><body><nav><a href='/'>Home</a></nav></body></html>".to_vec(), encoding: None });
    let outcome = fetch_and_extract(fetcher, url(), Options::default()).outcome().await;
    assert!(matches!(outcome, Some(Err(Error::NoContent))));
}
