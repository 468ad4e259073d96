//! Character-level lexer for ADIF tags.
//!
//! An ADIF data specifier has the form `<NAME:LENGTH:TYPE>DATA` where the
//! length and type are optional. Nothing in the format requires a
//! specifier to sit on a single line, so the lexer is a small state
//! machine fed one character at a time:
//!
//! ```text
//! WaitStart --'<'--> WaitEnd --'>'--> DoneTag            (no or zero length)
//!                            \--'>'--> Text --n chars--> DoneText
//! ```
//!
//! Once a unit is reported the lexer ignores further input until
//! [`TagLexer::reset`] is called.

use std::mem;

use crate::error::{ParseError, ParseResult};

/// Observable lexer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Skipping characters until a `<`.
    WaitStart,
    /// Accumulating tag text until a `>`.
    WaitEnd,
    /// A tag without payload has been recognized.
    DoneTag,
    /// Collecting a fixed number of payload characters.
    Text,
    /// A tag and its payload have been recognized.
    DoneText,
}

/// A completed tag, with its payload if it carried one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUnit {
    /// Field name, uppercased.
    pub name: String,
    /// Payload text, empty for bare or zero-length tags.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    WaitStart,
    WaitEnd {
        tag: String,
    },
    DoneTag,
    Text {
        name: String,
        remaining: usize,
        data: String,
    },
    DoneText,
}

/// Incremental lexer for a single ADIF tag.
#[derive(Debug, Clone)]
pub struct TagLexer {
    state: State,
}

impl TagLexer {
    pub fn new() -> Self {
        Self {
            state: State::WaitStart,
        }
    }

    /// Current state of the machine.
    pub fn state(&self) -> LexState {
        match self.state {
            State::WaitStart => LexState::WaitStart,
            State::WaitEnd { .. } => LexState::WaitEnd,
            State::DoneTag => LexState::DoneTag,
            State::Text { .. } => LexState::Text,
            State::DoneText => LexState::DoneText,
        }
    }

    /// Whether a unit has been completed and the lexer is waiting for a reset.
    pub fn is_done(&self) -> bool {
        matches!(self.state, State::DoneTag | State::DoneText)
    }

    /// Return to `WaitStart`, discarding any partial tag.
    pub fn reset(&mut self) {
        self.state = State::WaitStart;
    }

    /// Feed one character.
    ///
    /// Returns the completed unit when `c` finishes one. On error the lexer
    /// is left in `WaitStart`.
    pub fn feed(&mut self, c: char) -> ParseResult<Option<TagUnit>> {
        let state = mem::replace(&mut self.state, State::WaitStart);
        let (next, unit) = transition(state, c)?;
        self.state = next;
        Ok(unit)
    }
}

impl Default for TagLexer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure transition function: one character in, next state and optional unit out.
fn transition(state: State, c: char) -> ParseResult<(State, Option<TagUnit>)> {
    match state {
        State::WaitStart if c == '<' => Ok((State::WaitEnd { tag: String::new() }, None)),
        State::WaitStart => Ok((State::WaitStart, None)),

        State::WaitEnd { tag } if c == '>' => {
            let (name, length) = parse_tag(&tag)?;
            if length == 0 {
                let unit = TagUnit {
                    name,
                    data: String::new(),
                };
                Ok((State::DoneTag, Some(unit)))
            } else {
                Ok((
                    State::Text {
                        name,
                        remaining: length,
                        data: String::new(),
                    },
                    None,
                ))
            }
        }
        State::WaitEnd { mut tag } => {
            tag.push(c);
            Ok((State::WaitEnd { tag }, None))
        }

        State::Text {
            name,
            remaining,
            mut data,
        } => {
            data.push(c);
            if remaining > 1 {
                Ok((
                    State::Text {
                        name,
                        remaining: remaining - 1,
                        data,
                    },
                    None,
                ))
            } else {
                Ok((State::DoneText, Some(TagUnit { name, data })))
            }
        }

        // Completed units hold until the caller resets.
        done @ (State::DoneTag | State::DoneText) => Ok((done, None)),
    }
}

/// Split tag text such as `CALL:5:S` into its uppercased name and length.
///
/// The type indicator, if any, is ignored.
fn parse_tag(text: &str) -> ParseResult<(String, usize)> {
    let text = text.trim();
    let mut segments = text.split(':');
    let name = segments.next().unwrap_or_default().trim().to_ascii_uppercase();
    let length = match segments.next() {
        Some(len) => len
            .trim()
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidLength(text.to_string()))?,
        None => 0,
    };
    Ok((name, length))
}
