//! Column-qualifier scopes.

use crate::ast::{SelectStatement, TableRef};

/// The sources one statement brings into scope.
#[derive(Debug)]
pub(super) enum Frame<'a> {
    /// FROM and JOIN sources of a SELECT.
    Sources(Vec<&'a TableRef>),
    /// The target table of an INSERT, UPDATE or DELETE.
    Table(&'a str),
}

impl Frame<'_> {
    fn answers_to(&self, qualifier: &str) -> bool {
        match self {
            Self::Sources(sources) => sources.iter().any(|t| t.answers_to(qualifier)),
            Self::Table(name) => name.eq_ignore_ascii_case(qualifier),
        }
    }
}

/// Stack of frames, innermost last. A correlated subquery sees every
/// enclosing statement's sources.
#[derive(Debug, Default)]
pub(super) struct Scopes<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> Scopes<'a> {
    pub(super) fn push_select(&mut self, query: &'a SelectStatement) {
        let mut sources = Vec::with_capacity(1 + query.joins.len());
        sources.push(&query.from);
        sources.extend(query.joins.iter().map(|j| &j.table));
        self.frames.push(Frame::Sources(sources));
    }

    pub(super) fn push_table(&mut self, table: &'a str) {
        self.frames.push(Frame::Table(table));
    }

    pub(super) fn pop(&mut self) -> Option<Frame<'a>> {
        self.frames.pop()
    }

    pub(super) fn restore(&mut self, frame: Option<Frame<'a>>) {
        if let Some(frame) = frame {
            self.frames.push(frame);
        }
    }

    pub(super) fn resolves(&self, qualifier: &str) -> bool {
        self.frames.iter().any(|f| f.answers_to(qualifier))
    }
}
