#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use xmlsignal::{Attributes, Error, Notify, ParseError, ParserAdapter};

/// One scripted engine notification.
pub enum Note {
    Open(&'static str, &'static [(&'static str, &'static str)]),
    Text(&'static str),
    Close(&'static str),
    Finish,
    Fail(&'static str),
}

/// Counts what the stream asked the adapter to do.
#[derive(Clone, Default)]
pub struct Probe {
    pub started: Rc<Cell<usize>>,
    pub steps: Rc<Cell<usize>>,
    pub aborted: Rc<Cell<usize>>,
}

/// Adapter that replays a fixed script, one notification per step.
pub struct Scripted {
    notes: VecDeque<Note>,
    probe: Probe,
}

impl Scripted {
    pub fn new(notes: Vec<Note>) -> (Self, Probe) {
        let probe = Probe::default();
        let adapter = Self {
            notes: notes.into(),
            probe: probe.clone(),
        };
        (adapter, probe)
    }
}

impl ParserAdapter for Scripted {
    fn start(&mut self) {
        self.probe.started.set(self.probe.started.get() + 1);
    }

    fn step(&mut self, sink: &mut dyn Notify) {
        self.probe.steps.set(self.probe.steps.get() + 1);
        match self.notes.pop_front() {
            Some(Note::Open(name, attrs)) => {
                let attributes: Attributes = attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                sink.on_open(name.to_owned(), attributes)
            }
            Some(Note::Text(fragment)) => sink.on_text(fragment),
            Some(Note::Close(name)) => sink.on_close(name.to_owned()),
            Some(Note::Finish) => sink.on_finish(),
            Some(Note::Fail(message)) => {
                sink.on_fail(Error::MalformedXml(ParseError::new(message).at(1, 1)))
            }
            None => {}
        }
    }

    fn abort(&mut self) {
        self.probe.aborted.set(self.probe.aborted.get() + 1);
        self.notes.clear();
    }
}
