//! licw-score - A Rust library and CLI for scoring ADIF logs in the LICW CW challenge.
//!
//! This crate provides:
//! - An incremental ADIF reader that tolerates tags split across lines
//! - QSO validation and LICW point calculation from `LICW[...]` comments
//! - Challenge aggregation with per-band deduplication and date filtering
//!
//! # Example
//!
//! ```rust
//! use licw_score::{Challenge, DateRange, LICW_TABLES, LogReader};
//!
//! let mut reader = LogReader::new(&LICW_TABLES);
//! reader
//!     .parse("<CALL:5>K2LCW<BAND:3>40M<NAME:3>Rob<QSO_DATE:8>20250115<MODE:2>CW")
//!     .unwrap();
//! reader.parse("<COMMENT:14>LICW[IA:0042s]<EOR>").unwrap();
//! reader.finish();
//!
//! let mut challenge = Challenge::new(DateRange::default());
//! challenge.add_qsos(reader.take_qsos());
//! let score = challenge.calculate_score();
//!
//! // 5 base + 3 bonus + 1 for the SPC
//! assert_eq!(score.total, 9);
//! ```

pub mod challenge;
pub mod config;
pub mod error;
pub mod lexer;
pub mod points;
pub mod qso;
pub mod quarter;
pub mod reader;
pub mod report;

pub use challenge::{Challenge, DateRange, Rejections, Score};
pub use config::{Config, OutputFormat};
pub use error::{LogError, ParseError};
pub use lexer::{LexState, TagLexer, TagUnit};
pub use points::{LICW_TABLES, ScoringTables};
pub use qso::{FieldMap, Omission, Qso};
pub use quarter::{Quarter, QuarterError};
pub use reader::{LogReader, ReaderStats};
pub use report::ChallengeReport;
