use std::io;

use xmlsignal::{
    dictionary_from_source, dictionary_with_loader, include_all, Error, ParseOptions, Source,
    Value,
};

const FEED: &str = "<root><a>1</a><b>2</b></root>";

fn expected() -> Value {
    Value::Map(
        [("a", "1"), ("b", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), Value::from(v)))
            .collect(),
    )
}

#[tokio::test]
async fn text_and_bytes_sources() {
    let from_text = dictionary_from_source(FEED, ParseOptions::default(), include_all)
        .await
        .unwrap();
    let from_bytes =
        dictionary_from_source(FEED.as_bytes(), ParseOptions::default(), include_all)
            .await
            .unwrap();
    assert_eq!(from_text, expected());
    assert_eq!(from_bytes, expected());
}

#[tokio::test]
async fn file_source() {
    let path = std::env::temp_dir().join(format!("xmlsignal-{}.xml", std::process::id()));
    std::fs::write(&path, FEED).unwrap();

    let tree = dictionary_from_source(Source::path(&path), ParseOptions::default(), |name| {
        name != "a"
    })
    .await;
    std::fs::remove_file(&path).unwrap();

    assert_eq!(tree.unwrap().get("b"), Some(&Value::from("2")));
}

#[tokio::test]
async fn missing_file_is_a_source_error() {
    let path = std::env::temp_dir().join("xmlsignal-does-not-exist.xml");
    let result = dictionary_from_source(Source::path(path), ParseOptions::default(), include_all)
        .await;
    assert!(matches!(result, Err(Error::Source(e)) if e.kind() == io::ErrorKind::NotFound));
}

#[tokio::test]
async fn async_reader_source() {
    let source = Source::reader(FEED.as_bytes());
    let tree = dictionary_from_source(source, ParseOptions::default(), include_all)
        .await
        .unwrap();
    assert_eq!(tree, expected());
}

#[tokio::test]
async fn loader_failure_is_forwarded() {
    let load = async {
        Err::<Vec<u8>, _>(Error::Source(io::Error::new(io::ErrorKind::Other, "offline")))
    };
    let result = dictionary_with_loader(load, ParseOptions::default(), include_all).await;
    assert!(matches!(result, Err(Error::Source(e)) if e.to_string() == "offline"));
}

#[tokio::test]
async fn malformed_source_fails() {
    let result =
        dictionary_from_source("<root><a></root>", ParseOptions::default(), include_all).await;
    assert!(matches!(result, Err(Error::MalformedXml(_))));
}

#[tokio::test]
async fn options_reach_the_engine() {
    let xml = "<root><a>  padded  </a></root>";
    let raw = dictionary_from_source(xml, ParseOptions::default(), include_all)
        .await
        .unwrap();
    let trimmed = dictionary_from_source(
        xml,
        ParseOptions::new().trim_whitespace(true),
        include_all,
    )
    .await
    .unwrap();

    assert_eq!(raw.get("a"), Some(&Value::from("  padded  ")));
    assert_eq!(trimmed.get("a"), Some(&Value::from("padded")));
}
