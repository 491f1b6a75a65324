//! Reactive-style XML parsing on top of the `xml` crate.
//!
//! Two ways in: [`parse_buffer`] yields a lazy stream of [`Element`] events
//! (open, data, close), and the `dictionary_*` functions fold a whole document
//! into one nested [`Value`], optionally dropping subtrees by element name.

use std::future::Future;
use std::io::Read;

pub mod data_types;
pub mod error;
pub mod parser;
pub mod source;
pub mod stream;
pub mod tree;

pub use data_types::{Attributes, Element, Phase, Value};
pub use error::{Error, Location, ParseError};
pub use parser::{Notify, ParseOptions, ParserAdapter, XmlAdapter};
pub use source::Source;
pub use stream::{CancelHandle, ElementStream};
pub use tree::{include_all, reduce, TreeReducer};

/// Element events for the document in `from`. Nothing is read until the first event is requested.
pub fn parse_buffer<R: Read>(from: R) -> ElementStream<XmlAdapter<R>> {
    parse_buffer_with_options(from, ParseOptions::default())
}

/// Like [`parse_buffer`], with explicit engine and whitespace settings.
pub fn parse_buffer_with_options<R: Read>(
    from: R,
    options: ParseOptions,
) -> ElementStream<XmlAdapter<R>> {
    ElementStream::new(XmlAdapter::new(from, options)).keep_blank_text(options.keep_blank_text)
}

/// Element events for an in-memory document.
pub fn parse_bytes(bytes: &[u8]) -> ElementStream<XmlAdapter<&[u8]>> {
    parse_buffer(bytes)
}

/// Element events for a document held as text.
pub fn parse_str(text: &str) -> ElementStream<XmlAdapter<&[u8]>> {
    parse_buffer(text.as_bytes())
}

/// Parses the document in `from` into a single tree, keeping only subtrees whose
/// element name passes `include`. Pass [`include_all`] to keep everything.
pub fn dictionary_from_reader<R, F>(from: R, include: F) -> Result<Value, Error>
where
    R: Read,
    F: Fn(&str) -> bool,
{
    dictionary_from_reader_with_options(from, ParseOptions::default(), include)
}

/// Like [`dictionary_from_reader`], with explicit engine and whitespace settings.
pub fn dictionary_from_reader_with_options<R, F>(
    from: R,
    options: ParseOptions,
    include: F,
) -> Result<Value, Error>
where
    R: Read,
    F: Fn(&str) -> bool,
{
    reduce(parse_buffer_with_options(from, options), include)
}

/// See [`dictionary_from_reader`].
pub fn dictionary_from_bytes<F>(bytes: &[u8], include: F) -> Result<Value, Error>
where
    F: Fn(&str) -> bool,
{
    dictionary_from_reader(bytes, include)
}

/// See [`dictionary_from_reader`].
pub fn dictionary_from_str<F>(text: &str, include: F) -> Result<Value, Error>
where
    F: Fn(&str) -> bool,
{
    dictionary_from_reader(text.as_bytes(), include)
}

/// Loads `source`, then parses and reduces it.
///
/// Dropping the returned future cancels the whole operation without a result.
pub async fn dictionary_from_source<F>(
    source: impl Into<Source>,
    options: ParseOptions,
    include: F,
) -> Result<Value, Error>
where
    F: Fn(&str) -> bool,
{
    dictionary_with_loader(source.into().load(), options, include).await
}

/// Like [`dictionary_from_source`], with the bytes produced by a caller-supplied
/// future, e.g. a network fetch. Loader errors are returned unchanged.
pub async fn dictionary_with_loader<Fut, F>(
    load: Fut,
    options: ParseOptions,
    include: F,
) -> Result<Value, Error>
where
    Fut: Future<Output = Result<Vec<u8>, Error>>,
    F: Fn(&str) -> bool,
{
    let bytes = load.await?;
    reduce(parse_buffer_with_options(bytes.as_slice(), options), include)
}
