use reeeed::encoding::decode;
use reeeed::{extract_bytes, Error, Options, Url};

fn base() -> Url {
    Url::parse("https://example.com/").unwrap()
}

const BODY: &str = "This article body is long enough to be extracted, with commas, clauses, and a few more words at the end.";

fn page(head: &str, paragraph: &str) -> String {
    format!("<html><head>{head}</head><body><article><p>{paragraph}</p><p>{BODY}</p></article></body></html>")
}

#[test]
fn utf8_content_without_declaration() {
    let html = page("", "Special characters: é, ñ, ü, 中文, and enough extra text to matter here.");
    let doc = extract_bytes(html.as_bytes(), None, &base(), &Options::default()).unwrap();
    assert!(doc.content_text().contains("é, ñ, ü, 中文"));
}

#[test]
fn windows_1252_from_meta_charset() {
    let mut bytes = page(r#"<meta charset="windows-1252">"#, "Caf").into_bytes();
    // Insert "é" as a single 0xE9 byte after "Caf"
    let at = bytes.windows(3).position(|w| w == b"Caf").unwrap() + 3;
    bytes.insert(at, 0xE9);
    let doc = extract_bytes(&bytes, None, &base(), &Options::default()).unwrap();
    assert!(doc.content_text().contains("Café"));
}

#[test]
fn declared_encoding_wins_over_meta() {
    // 0xE9 is "é" in latin-1 but invalid on its own in UTF-8
    let bytes = b"<meta charset=\"utf-8\"><p>Caf\xE9</p>";
    let text = decode(bytes, Some("ISO-8859-1")).unwrap();
    assert!(text.contains("Café"));
}

#[test]
fn wrong_meta_charset_falls_back() {
    // Declares UTF-8 but is latin-1
    let bytes = b"<meta charset=\"utf-8\"><p>na\xEFve</p>";
    let text = decode(bytes, None).unwrap();
    assert!(text.contains("naïve"));
}

#[test]
fn shift_jis_from_meta_charset() {
    let mut bytes = b"<html><head><meta charset=\"shift_jis\"></head><body><p>".to_vec();
    bytes.extend_from_slice(&[0x93, 0xFA, 0x96, 0x7B, 0x8C, 0xEA]);
    bytes.extend_from_slice(b"</p></body></html>");
    let text = decode(&bytes, None).unwrap();
    assert!(text.contains("日本語"));
}

#[test]
fn utf8_bom_is_stripped() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"<p>hello</p>");
    let text = decode(&bytes, Some("windows-1252")).unwrap();
    assert_eq!(text, "<p>hello</p>");
}

#[test]
fn unknown_declared_label_is_ignored() {
    let text = decode("<p>plain ascii</p>".as_bytes(), Some("x-no-such-charset")).unwrap();
    assert_eq!(text, "<p>plain ascii</p>");
}

#[test]
fn binary_payload_is_rejected() {
    let png = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x10\x00\x00\x00\x10\x08\x06";
    assert!(matches!(decode(png, None), Err(Error::EncodingError(_))));
    assert!(matches!(
        extract_bytes(png, Some("utf-8"), &base(), &Options::default()),
        Err(Error::EncodingError(_))
    ));
}
