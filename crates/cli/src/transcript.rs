//! Console transcript + audit trail for a demo run.

use std::io::{self, Write};

use ledgerkit_core::DomainResult;
use ledgerkit_events::AuditTrail;

use crate::event::LedgerEvent;

/// Writes the human-readable run log and records every accepted event.
///
/// Rejected operations are printed as `error: ...` and the run carries on;
/// only IO failures on the output itself are returned to the caller.
#[derive(Debug)]
pub struct Transcript<W> {
    out: W,
    trail: AuditTrail<LedgerEvent>,
}

impl<W: Write> Transcript<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            trail: AuditTrail::new(),
        }
    }

    pub fn line(&mut self, text: impl core::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "\n=== {title} ===")
    }

    /// Print and record the events of an accepted operation, or print the rejection.
    ///
    /// Returns whether the operation was accepted.
    pub fn outcome<E>(
        &mut self,
        aggregate_type: &str,
        aggregate_id: &str,
        result: DomainResult<Vec<E>>,
    ) -> io::Result<bool>
    where
        E: Into<LedgerEvent>,
    {
        match result {
            Ok(events) => {
                let events: Vec<LedgerEvent> = events.into_iter().map(Into::into).collect();
                for event in &events {
                    writeln!(self.out, "{event}")?;
                }
                self.trail.record(aggregate_type, aggregate_id, events);
                Ok(true)
            }
            Err(e) => {
                writeln!(self.out, "error: {e}")?;
                Ok(false)
            }
        }
    }

    /// Like [`Transcript::outcome`] for operations returning a single event.
    pub fn single<E>(
        &mut self,
        aggregate_type: &str,
        aggregate_id: &str,
        result: DomainResult<E>,
    ) -> io::Result<Option<E>>
    where
        E: Clone + Into<LedgerEvent>,
    {
        match result {
            Ok(event) => {
                self.outcome(aggregate_type, aggregate_id, Ok(vec![event.clone()]))?;
                Ok(Some(event))
            }
            Err(e) => {
                self.outcome::<E>(aggregate_type, aggregate_id, Err(e))?;
                Ok(None)
            }
        }
    }

    pub fn trail(&self) -> &AuditTrail<LedgerEvent> {
        &self.trail
    }

    pub fn into_parts(self) -> (W, AuditTrail<LedgerEvent>) {
        (self.out, self.trail)
    }
}
