//! Adapter around the `xml` crate's pull parser. It is the only code that talks to
//! the engine; everything downstream sees the [`Notify`] callbacks.

use std::io::{BufReader, Read};
use std::mem;

use log::{debug, trace, warn};
use xml::{name::OwnedName, reader::XmlEvent, EventReader, ParserConfig};

use crate::{data_types::Attributes, error::Error};

/// Receives the adapter's notifications, in document order.
///
/// Exactly one of [`Notify::on_finish`] or [`Notify::on_fail`] is delivered per parse,
/// and nothing follows it.
pub trait Notify {
    fn on_open(&mut self, name: String, attributes: Attributes);
    /// A raw text or CDATA fragment. An element's text may arrive split over several calls.
    fn on_text(&mut self, fragment: &str);
    fn on_close(&mut self, name: String);
    fn on_finish(&mut self);
    fn on_fail(&mut self, error: Error);
}

/// A byte-level XML engine driven one notification batch at a time.
///
/// An adapter owns its input and is good for a single parse.
pub trait ParserAdapter {
    /// Begins the parse. Called at most once.
    fn start(&mut self);
    /// Advances the scan, delivering zero or more notifications to `sink`.
    /// Does nothing once a terminal notification has been delivered or after [`ParserAdapter::abort`].
    fn step(&mut self, sink: &mut dyn Notify);
    /// Stops consuming input.
    fn abort(&mut self);
}

/// Engine settings, translated into an [`xml::ParserConfig`]. Comments are always ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Let the engine trim each text fragment on its own. Off by default, since
    /// trimming fragments separately glues mixed content together.
    pub trim_whitespace: bool,
    /// Emit DATA for elements whose text is only whitespace, e.g. indentation.
    pub keep_blank_text: bool,
    /// Report CDATA as ordinary characters instead of separate fragments.
    pub cdata_to_characters: bool,
    /// Merge adjacent character events inside the engine.
    pub coalesce_characters: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trim_whitespace: false,
            keep_blank_text: false,
            cdata_to_characters: false,
            coalesce_characters: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trim_whitespace(mut self, value: bool) -> Self {
        self.trim_whitespace = value;
        self
    }

    pub fn keep_blank_text(mut self, value: bool) -> Self {
        self.keep_blank_text = value;
        self
    }

    pub fn cdata_to_characters(mut self, value: bool) -> Self {
        self.cdata_to_characters = value;
        self
    }

    pub fn coalesce_characters(mut self, value: bool) -> Self {
        self.coalesce_characters = value;
        self
    }

    fn config(&self) -> ParserConfig {
        ParserConfig::new()
            .ignore_comments(true)
            .trim_whitespace(self.trim_whitespace)
            .whitespace_to_characters(true)
            .cdata_to_characters(self.cdata_to_characters)
            .coalesce_characters(self.coalesce_characters)
    }
}

enum State<R: Read> {
    Idle(R),
    Running(EventReader<BufReader<R>>),
    Done,
}

/// [`ParserAdapter`] backed by [`xml::EventReader`].
pub struct XmlAdapter<R: Read> {
    state: State<R>,
    config: ParserConfig,
}

impl<R: Read> XmlAdapter<R> {
    pub fn new(source: R, options: ParseOptions) -> Self {
        Self {
            state: State::Idle(source),
            config: options.config(),
        }
    }
}

/// Raw `prefix:local` name, namespaces are passed through untouched.
fn qualified(name: OwnedName) -> String {
    match name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local_name),
        None => name.local_name,
    }
}

impl<R: Read> ParserAdapter for XmlAdapter<R> {
    fn start(&mut self) {
        match mem::replace(&mut self.state, State::Done) {
            State::Idle(source) => {
                debug!("starting parse");
                let file = BufReader::new(source); // Buffering is important for performance
                self.state = State::Running(EventReader::new_with_config(file, self.config.clone()));
            }
            other => {
                warn!("adapter started twice, ignoring");
                self.state = other;
            }
        }
    }

    fn step(&mut self, sink: &mut dyn Notify) {
        let State::Running(reader) = &mut self.state else {
            return;
        };
        let event = match reader.next() {
            Ok(event) => event,
            Err(e) => {
                debug!("parse failed: {e}");
                self.state = State::Done;
                sink.on_fail(e.into());
                return;
            }
        };
        trace!("{event:?}");
        match event {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                let attributes = attributes
                    .into_iter()
                    .map(|attr| (qualified(attr.name), attr.value))
                    .collect();
                sink.on_open(qualified(name), attributes);
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) | XmlEvent::Whitespace(text) => {
                sink.on_text(&text)
            }
            XmlEvent::EndElement { name } => sink.on_close(qualified(name)),
            XmlEvent::EndDocument => {
                debug!("parse finished");
                self.state = State::Done;
                sink.on_finish();
            }
            _ => {}
        }
    }

    fn abort(&mut self) {
        if let State::Running(_) = self.state {
            debug!("parse aborted");
        }
        self.state = State::Done;
    }
}
