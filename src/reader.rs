//! Record assembly on top of the tag lexer.
//!
//! Lines are fed one at a time with their terminators stripped. A tag may
//! span any number of calls. A log has a header only if its very first
//! character is not `<`; the header runs up to `<EOH>` and is discarded.
//! Each `<EOR>` in the body closes a record, which is converted to a
//! [`Qso`] and queued if it can be scored.

use std::mem;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{LogError, ParseError};
use crate::lexer::{LexState, TagLexer, TagUnit};
use crate::points::ScoringTables;
use crate::qso::{FieldMap, Qso};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Nothing read yet.
    Start,
    Header,
    Body,
}

/// Counters for one log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReaderStats {
    /// Records closed by `<EOR>`.
    pub records: u64,
    /// Records dropped because they cannot be scored.
    pub omitted: u64,
}

/// Incremental ADIF reader producing scorable QSOs.
#[derive(Debug)]
pub struct LogReader<'t> {
    tables: &'t ScoringTables,
    lexer: TagLexer,
    section: Section,
    fields: FieldMap,
    /// 1-based ordinal of the record being assembled.
    record: u64,
    qsos: Vec<Qso>,
    stats: ReaderStats,
}

impl<'t> LogReader<'t> {
    pub fn new(tables: &'t ScoringTables) -> Self {
        Self {
            tables,
            lexer: TagLexer::new(),
            section: Section::Start,
            fields: FieldMap::new(),
            record: 1,
            qsos: Vec::new(),
            stats: ReaderStats::default(),
        }
    }

    /// Feed one line of input, without its line terminator.
    pub fn parse(&mut self, line: &str) -> Result<(), LogError> {
        for c in line.chars() {
            if self.section == Section::Start {
                self.section = if c == '<' {
                    Section::Body
                } else {
                    Section::Header
                };
            }

            let unit = match self.lexer.feed(c) {
                Ok(unit) => unit,
                Err(e) => return Err(self.locate(e)),
            };
            if let Some(unit) = unit {
                self.lexer.reset();
                self.accept(unit)?;
            }
        }
        Ok(())
    }

    /// Drain the QSOs published so far.
    pub fn take_qsos(&mut self) -> Vec<Qso> {
        mem::take(&mut self.qsos)
    }

    /// QSOs published so far.
    pub fn qsos(&self) -> &[Qso] {
        &self.qsos
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// End of input. Fields after the last `<EOR>` are discarded.
    pub fn finish(&mut self) -> ReaderStats {
        if self.lexer.state() != LexState::WaitStart {
            warn!(
                "Discarding unterminated record {}: input ended inside a tag",
                self.record
            );
        }
        if !self.fields.is_empty() {
            warn!(
                "Discarding unterminated record {} ({} fields without <EOR>)",
                self.record,
                self.fields.len()
            );
            self.fields.clear();
        }
        if self.section == Section::Header {
            warn!("Log ended inside the header; no <EOH> found");
        }
        self.lexer.reset();
        self.stats
    }

    fn accept(&mut self, unit: TagUnit) -> Result<(), LogError> {
        match self.section {
            Section::Start | Section::Header => {
                if unit.name == "EOH" {
                    self.section = Section::Body;
                }
            }
            Section::Body if unit.name == "EOR" => self.close_record()?,
            Section::Body => {
                if !unit.data.is_empty() {
                    self.fields.insert(unit.name, unit.data);
                }
            }
        }
        Ok(())
    }

    fn close_record(&mut self) -> Result<(), LogError> {
        let qso = match Qso::from_fields(&self.fields, self.tables) {
            Ok(qso) => qso,
            Err(e) => return Err(self.locate(e)),
        };

        self.stats.records += 1;
        match qso.omission() {
            None => self.qsos.push(qso),
            Some(reason) => {
                self.stats.omitted += 1;
                debug!("Skipping record {} ({}): {}", self.record, qso.callsign(), reason);
            }
        }

        self.fields.clear();
        self.record += 1;
        Ok(())
    }

    /// Attach the current record ordinal and identifying fields to an error.
    fn locate(&self, err: ParseError) -> LogError {
        let get = |name: &str| self.fields.get(name).map(String::as_str).unwrap_or("?");
        LogError::from(err).context(format!(
            "record {} (call {}, date {}, time {})",
            self.record,
            get("CALL"),
            get("QSO_DATE"),
            get("TIME_ON"),
        ))
    }
}
