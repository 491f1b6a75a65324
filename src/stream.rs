//! Turns adapter notifications into an ordered, lazy sequence of [`Element`] events.
//!
//! The stream is cold: the adapter is only started when the first event is
//! requested. Dropping the stream or calling [`ElementStream::cancel`] aborts the
//! adapter right away. A [`CancelHandle`] only sets a flag: no further events are
//! produced, but the adapter is aborted on the next poll or when the stream is dropped.
//!
//! Text that is only whitespace (indentation between tags) produces no DATA event
//! unless [`ElementStream::keep_blank_text`] is set.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use log::{debug, warn};
use tokio_stream::Stream;

use crate::{
    data_types::{Attributes, Element},
    error::{Error, ParseError},
    parser::{Notify, ParserAdapter},
};

/// Stops an [`ElementStream`] from another owner. Checked before every emission;
/// the adapter itself is aborted the next time the stream is polled or dropped.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One still-open element.
struct Frame {
    name: String,
    attributes: Attributes,
    text: String,
}

/// Per-parse state: the open-element stack and the events not yet handed out.
#[derive(Default)]
struct Producer {
    frames: Vec<Frame>,
    ready: VecDeque<Result<Element, Error>>,
    done: bool,
    keep_blank_text: bool,
}

impl Producer {
    fn terminated(&self, notification: &str) -> bool {
        if self.done {
            warn!("adapter sent {notification} after the parse ended, ignoring");
        }
        self.done
    }
}

impl Notify for Producer {
    fn on_open(&mut self, name: String, attributes: Attributes) {
        if self.terminated("open") {
            return;
        }
        self.ready
            .push_back(Ok(Element::open(name.clone(), attributes.clone())));
        self.frames.push(Frame {
            name,
            attributes,
            text: String::new(),
        });
    }

    fn on_text(&mut self, fragment: &str) {
        if self.terminated("text") {
            return;
        }
        // text outside the root element has no owner
        if let Some(top) = self.frames.last_mut() {
            top.text.push_str(fragment);
        }
    }

    fn on_close(&mut self, name: String) {
        if self.terminated("close") {
            return;
        }
        let Some(frame) = self.frames.pop() else {
            self.on_fail(ParseError::new(format!("unexpected closing tag: {name}")).into());
            return;
        };
        let blank = frame.text.chars().all(char::is_whitespace);
        if !frame.text.is_empty() && (self.keep_blank_text || !blank) {
            self.ready
                .push_back(Ok(Element::data(frame.name, frame.text, frame.attributes)));
        }
        self.ready.push_back(Ok(Element::close(name)));
    }

    fn on_finish(&mut self) {
        if self.terminated("finish") {
            return;
        }
        self.done = true;
    }

    fn on_fail(&mut self, error: Error) {
        if self.terminated("fail") {
            return;
        }
        self.frames.clear();
        self.ready.push_back(Err(error));
        self.done = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Pending,
    Running,
    Finished,
}

/// Lazy, cancellable sequence of [`Element`] events.
///
/// A malformed document ends the sequence with a single `Err`. Events already
/// produced before the failure are still delivered first.
pub struct ElementStream<A: ParserAdapter> {
    adapter: A,
    state: StreamState,
    producer: Producer,
    cancel: CancelHandle,
}

impl<A: ParserAdapter> ElementStream<A> {
    /// Wraps `adapter` without starting it.
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            state: StreamState::Pending,
            producer: Producer::default(),
            cancel: CancelHandle::default(),
        }
    }

    /// Emit DATA events for whitespace-only text as well.
    pub fn keep_blank_text(mut self, keep: bool) -> Self {
        self.producer.keep_blank_text = keep;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Stops the parse. Idempotent.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.state == StreamState::Running && !self.producer.done {
            debug!("element stream cancelled");
            self.adapter.abort();
        }
        self.state = StreamState::Finished;
        self.producer.frames.clear();
        self.producer.ready.clear();
    }
}

impl<A: ParserAdapter> Iterator for ElementStream<A> {
    type Item = Result<Element, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cancel.is_cancelled() {
                self.shutdown();
                return None;
            }
            if let Some(item) = self.producer.ready.pop_front() {
                return Some(item);
            }
            match self.state {
                StreamState::Pending => {
                    self.adapter.start();
                    self.state = StreamState::Running;
                }
                StreamState::Running if self.producer.done => {
                    self.state = StreamState::Finished;
                }
                StreamState::Running => self.adapter.step(&mut self.producer),
                StreamState::Finished => return None,
            }
        }
    }
}

impl<A: ParserAdapter> FusedIterator for ElementStream<A> {}

impl<A: ParserAdapter + Unpin> Stream for ElementStream<A> {
    type Item = Result<Element, Error>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // parsing never waits on I/O once the bytes are here
        Poll::Ready(self.get_mut().next())
    }
}

impl<A: ParserAdapter> Drop for ElementStream<A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
