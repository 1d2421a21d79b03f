use std::cell::RefCell;

use thiserror::Error;

use crate::{NodeId, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

/// Something the map noticed about itself. None of these change the outcome
/// of the operation that raised them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// The insertion walk met a stored key that `equals` the new one even
    /// though the lookup beforehand missed it. Only inconsistent
    /// `compare`/`equals` pairs get here.
    #[error("key collision detected in map")]
    KeyCollision,
    #[error("cannot rotate {direction} on a node with no {} child", .direction.opposite())]
    RotationPrecondition { direction: Side },
    #[error("map inconsistency: {listed} entries listed but the map holds {len}")]
    CountMismatch { listed: usize, len: usize },
    #[error("map inconsistency: node {node} is not a child of its own parent")]
    MalformedChild { node: NodeId },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::KeyCollision => Level::Warning,
            Diagnostic::RotationPrecondition { .. }
            | Diagnostic::CountMismatch { .. }
            | Diagnostic::MalformedChild { .. } => Level::Error,
        }
    }
}

/// Receives the map's diagnostics. Must not panic.
pub trait Sink {
    fn notify(&self, level: Level, diagnostic: &Diagnostic);
}

impl<S: Sink + ?Sized> Sink for &S {
    fn notify(&self, level: Level, diagnostic: &Diagnostic) {
        (**self).notify(level, diagnostic);
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn notify(&self, level: Level, diagnostic: &Diagnostic) {
        match level {
            Level::Warning => tracing::warn!(target: "rbmap", "{diagnostic}"),
            Level::Error => tracing::error!(target: "rbmap", "{diagnostic}"),
        }
    }
}

/// Drops every diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Silent;

impl Sink for Silent {
    fn notify(&self, _level: Level, _diagnostic: &Diagnostic) {}
}

/// Keeps every diagnostic, in arrival order.
#[derive(Debug, Default)]
pub struct Recorder {
    events: RefCell<Vec<(Level, Diagnostic)>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Level, Diagnostic)> {
        self.events.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn take(&self) -> Vec<(Level, Diagnostic)> {
        self.events.take()
    }
}

impl Sink for Recorder {
    fn notify(&self, level: Level, diagnostic: &Diagnostic) {
        self.events.borrow_mut().push((level, diagnostic.clone()));
    }
}
