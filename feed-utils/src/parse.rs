use feed_structs::{Event, FeedConfig};
use std::{io::BufRead, str::FromStr};
use thiserror::Error;

/// Upper limit on announced events, story scores and story heights. With all
/// three capped at 32 bits, no page total can leave `u64`.
pub const MAX_EVENTS: usize = u32::MAX as usize;
pub const MAX_SCORE: u64 = u32::MAX as u64;
pub const MAX_HEIGHT: u64 = u32::MAX as u64;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is empty, expected a header line `N W H`")]
    MissingHeader,

    #[error("line {line}: expected header `N W H`, got {content:?}")]
    BadHeader { line: usize, content: String },

    #[error("line {line}: expected `S <time> <score> <height>` or `R <time>`, got {content:?}")]
    BadEvent { line: usize, content: String },

    #[error("line {line}: invalid number {token:?}")]
    BadNumber { line: usize, token: String },

    #[error("line {line}: {token:?} exceeds the limit of {max}")]
    OutOfRange { line: usize, token: String, max: u64 },

    #[error("line {line}: story height must be positive")]
    ZeroHeight { line: usize },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

fn number<T: FromStr>(token: &str, line: usize) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::BadNumber {
        line,
        token: token.to_string(),
    })
}

fn bounded(token: &str, line: usize, max: u64) -> Result<u64, ParseError> {
    let n: u64 = number(token, line)?;
    if n > max {
        return Err(ParseError::OutOfRange {
            line,
            token: token.to_string(),
            max,
        });
    }
    Ok(n)
}

/// Parses the `N W H` header line.
pub fn parse_header(content: &str) -> Result<FeedConfig, ParseError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    match tokens[..] {
        [n, w, h] => Ok(FeedConfig::new(
            bounded(n, 1, MAX_EVENTS as u64)? as usize,
            number(w, 1)?,
            number(h, 1)?,
        )),
        _ => Err(ParseError::BadHeader {
            line: 1,
            content: content.trim_end().to_string(),
        }),
    }
}

/// Parses one event line. `line` is the 1-based position used in errors.
pub fn parse_event(content: &str, line: usize) -> Result<Event, ParseError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    match tokens[..] {
        ["S", time, score, height] => {
            let timestamp = number(time, line)?;
            let value = bounded(score, line, MAX_SCORE)?;
            let weight = bounded(height, line, MAX_HEIGHT)?;
            if weight == 0 {
                return Err(ParseError::ZeroHeight { line });
            }
            Ok(Event::Story {
                timestamp,
                value,
                weight,
            })
        }
        ["R", time] => Ok(Event::Reload {
            timestamp: number(time, line)?,
        }),
        _ => Err(ParseError::BadEvent {
            line,
            content: content.trim_end().to_string(),
        }),
    }
}

/// Streams the events announced by a header.
///
/// Yields at most `event_count` events; anything after them is never read.
/// Running out of lines early simply ends the stream, check `is_truncated`
/// afterwards.
pub struct EventReader<R> {
    reader: R,
    buf: String,
    line: usize,
    remaining: usize,
    truncated: bool,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(mut reader: R) -> Result<(FeedConfig, Self), ParseError> {
        let mut buf = String::new();
        if reader.read_line(&mut buf)? == 0 {
            return Err(ParseError::MissingHeader);
        }
        let config = parse_header(&buf)?;
        Ok((
            config,
            Self {
                reader,
                buf,
                line: 1,
                remaining: config.event_count,
                truncated: false,
            },
        ))
    }

    /// Number of lines consumed so far, header included.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn read_event(&mut self) -> Result<Option<Event>, ParseError> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            self.truncated = true;
            self.remaining = 0;
            return Ok(None);
        }
        self.line += 1;
        self.remaining -= 1;
        parse_event(&self.buf, self.line).map(Some)
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<Event, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.read_event() {
            Ok(event) => event.map(Ok),
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}
