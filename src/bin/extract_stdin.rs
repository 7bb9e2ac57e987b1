//! Read HTML from stdin and write the reader view to stdout.
//!
//! Usage: `reeeed <base-url> [theme-json] [--json] < page.html`
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::env;
use std::error::Error;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use reeeed::{extract_bytes, Options, Theme, Url};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: reeeed <base-url> [theme-json] [--json] < page.html";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("reeeed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut json_output = false;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--json" {
            json_output = true;
        } else {
            positional.push(arg);
        }
    }

    let base_url = positional.first().ok_or(USAGE)?;
    let base_url = Url::parse(base_url).map_err(|err| format!("invalid base URL {base_url}: {err}"))?;
    let theme = match positional.get(1) {
        Some(raw) => Theme::from_json(raw).map_err(|err| format!("invalid theme JSON: {err}"))?,
        None => Theme::default(),
    };

    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes)?;

    let doc = extract_bytes(&bytes, None, &base_url, &Options::default())?;

    let output = if json_output {
        let value = serde_json::json!({
            "url": doc.url().as_str(),
            "metadata": doc.metadata(),
            "content_html": doc.content_html(),
            "content_text": doc.content_text(),
        });
        serde_json::to_string_pretty(&value)?
    } else {
        doc.html(&theme, true)
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
