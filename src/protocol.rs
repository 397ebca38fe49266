//! ASCII line protocol spoken between the host (`HD_*` lines) and the device
//! (`DH_*` lines).
//!
//! | Message        | Host -> device         | Device -> host         |
//! |----------------|------------------------|------------------------|
//! | start          | `HD_START`             | `DH_START_<name>`      |
//! | checksum       | `HD_CS_[<digits>]`     | `DH_CS_<10 digits>`    |
//! | shot           | `HD_BOOM_<row>_<col>`  | `DH_BOOM_<row>_<col>`  |
//! | shot result    | `HD_BOOM_H` / `_M`     | `DH_BOOM_H` / `_M`     |
//! | field reveal   | `HD_SF<row>D<digits>`  | `DH_SF<row>D<digits>`  |
//!
//! Every numeric field is a single ASCII digit, which ties the wire format to
//! a board of at most 10×10 and cell values of at most 9. Encoded lines end in
//! `\n`; parsers expect the terminator to be stripped already.

use alloc::string::{String, ToString};
use core::fmt;

use crate::board::{Board, Checksum};
use crate::common::{in_bounds, Coord, ShotOutcome};
use crate::config::BOARD_SIZE;

const HOST_START: &str = "HD_START";
const HOST_CHECKSUM: &str = "HD_CS_";
const HOST_BOOM: &str = "HD_BOOM_";
const HOST_FIELD: &str = "HD_SF";

const DEVICE_START: &str = "DH_START_";
const DEVICE_CHECKSUM: &str = "DH_CS_";
const DEVICE_BOOM: &str = "DH_BOOM_";
const DEVICE_FIELD: &str = "DH_SF";

/// Length of a shot line such as `HD_BOOM_3_7`.
pub const SHOT_LINE_LEN: usize = 11;

/// Why an inbound line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownPrefix,
    BadLength { expected: usize, actual: usize },
    BadSeparator,
    NotADigit(char),
    OutOfRange { row: usize, col: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty line"),
            ParseError::UnknownPrefix => write!(f, "unknown message prefix"),
            ParseError::BadLength { expected, actual } => {
                write!(f, "bad length: expected {}, got {}", expected, actual)
            }
            ParseError::BadSeparator => write!(f, "missing field separator"),
            ParseError::NotADigit(ch) => write!(f, "expected a digit, got {:?}", ch),
            ParseError::OutOfRange { row, col } => {
                write!(f, "coordinate ({}, {}) is off the board", row, col)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// A value that does not fit the single-digit wire fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    FieldTooWide { value: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::FieldTooWide { value } => {
                write!(f, "value {} does not fit a single-digit field", value)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// One row of a revealed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRow {
    pub row: usize,
    pub cells: [u8; BOARD_SIZE],
}

impl FieldRow {
    pub fn from_board(board: &Board, row: usize) -> Self {
        Self {
            row,
            cells: board.row_digits(row),
        }
    }

    /// Number of non-zero cells, comparable with a checksum entry.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&d| d != 0).count()
    }

    /// Parse the `<row>D<digits>` part following an `_SF` prefix.
    fn parse_payload(payload: &str) -> Result<Self, ParseError> {
        let bytes = payload.as_bytes();
        let expected = 2 + BOARD_SIZE;
        if bytes.len() != expected {
            return Err(ParseError::BadLength {
                expected,
                actual: bytes.len(),
            });
        }
        let row = digit(bytes[0])? as usize;
        if row >= BOARD_SIZE {
            return Err(ParseError::OutOfRange { row, col: 0 });
        }
        if bytes[1] != b'D' {
            return Err(ParseError::BadSeparator);
        }
        let mut cells = [0u8; BOARD_SIZE];
        for (cell, &b) in cells.iter_mut().zip(&bytes[2..]) {
            *cell = digit(b)?;
        }
        Ok(Self { row, cells })
    }

    fn push_encoded(&self, prefix: &str, out: &mut String) -> Result<(), EncodeError> {
        out.push_str(prefix);
        out.push(digit_char(self.row)?);
        out.push('D');
        for &d in self.cells.iter() {
            out.push(digit_char(d as usize)?);
        }
        Ok(())
    }
}

/// Lines sent by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    Start,
    /// Checksum request, optionally carrying the host's own checksum.
    ChecksumRequest { host: Option<Checksum> },
    Shot(Coord),
    ShotResult(ShotOutcome),
    /// The host reveals its field, which means it lost. The row is present
    /// only when the payload is well formed.
    FieldReveal(Option<FieldRow>),
}

impl HostMessage {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        if line.starts_with(HOST_START) {
            return Ok(HostMessage::Start);
        }
        if let Some(rest) = line.strip_prefix(HOST_CHECKSUM) {
            return Ok(HostMessage::ChecksumRequest {
                host: parse_checksum_digits(rest).ok(),
            });
        }
        if let Some(rest) = line.strip_prefix(HOST_BOOM) {
            return match shot_result(rest) {
                Some(outcome) => Ok(HostMessage::ShotResult(outcome)),
                None => parse_boom(line).map(HostMessage::Shot),
            };
        }
        if let Some(rest) = line.strip_prefix(HOST_FIELD) {
            return Ok(HostMessage::FieldReveal(FieldRow::parse_payload(rest).ok()));
        }
        Err(ParseError::UnknownPrefix)
    }

    pub fn encode(&self) -> Result<String, EncodeError> {
        let mut out = String::new();
        match self {
            HostMessage::Start => out.push_str(HOST_START),
            HostMessage::ChecksumRequest { host } => {
                out.push_str(HOST_CHECKSUM);
                if let Some(cs) = host {
                    push_digits(cs.counts(), &mut out)?;
                }
            }
            HostMessage::Shot(coord) => push_shot(HOST_BOOM, *coord, &mut out)?,
            HostMessage::ShotResult(outcome) => push_result(HOST_BOOM, *outcome, &mut out),
            HostMessage::FieldReveal(Some(row)) => row.push_encoded(HOST_FIELD, &mut out)?,
            HostMessage::FieldReveal(None) => out.push_str(HOST_FIELD),
        }
        out.push('\n');
        Ok(out)
    }
}

/// Lines sent by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceMessage {
    StartAck(String),
    Checksum(Checksum),
    Shot(Coord),
    ShotResult(ShotOutcome),
    FieldRow(FieldRow),
}

impl DeviceMessage {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        if let Some(name) = line.strip_prefix(DEVICE_START) {
            return Ok(DeviceMessage::StartAck(name.to_string()));
        }
        if let Some(rest) = line.strip_prefix(DEVICE_CHECKSUM) {
            return parse_checksum_digits(rest).map(DeviceMessage::Checksum);
        }
        if let Some(rest) = line.strip_prefix(DEVICE_BOOM) {
            return match shot_result(rest) {
                Some(outcome) => Ok(DeviceMessage::ShotResult(outcome)),
                None => parse_shot(line, DEVICE_BOOM).map(DeviceMessage::Shot),
            };
        }
        if let Some(rest) = line.strip_prefix(DEVICE_FIELD) {
            return FieldRow::parse_payload(rest).map(DeviceMessage::FieldRow);
        }
        Err(ParseError::UnknownPrefix)
    }

    pub fn encode(&self) -> Result<String, EncodeError> {
        let mut out = String::new();
        match self {
            DeviceMessage::StartAck(name) => {
                out.push_str(DEVICE_START);
                out.push_str(name);
            }
            DeviceMessage::Checksum(cs) => {
                out.push_str(DEVICE_CHECKSUM);
                push_digits(cs.counts(), &mut out)?;
            }
            DeviceMessage::Shot(coord) => push_shot(DEVICE_BOOM, *coord, &mut out)?,
            DeviceMessage::ShotResult(outcome) => push_result(DEVICE_BOOM, *outcome, &mut out),
            DeviceMessage::FieldRow(row) => row.push_encoded(DEVICE_FIELD, &mut out)?,
        }
        out.push('\n');
        Ok(out)
    }
}

/// Parse a host shot line `HD_BOOM_<row>_<col>`.
pub fn parse_boom(line: &str) -> Result<Coord, ParseError> {
    parse_shot(line, HOST_BOOM)
}

/// Encode the device's shot line `DH_BOOM_<row>_<col>\n`.
pub fn format_shot(coord: Coord) -> Result<String, EncodeError> {
    DeviceMessage::Shot(coord).encode()
}

fn parse_shot(line: &str, prefix: &str) -> Result<Coord, ParseError> {
    let payload = line
        .strip_prefix(prefix)
        .ok_or(ParseError::UnknownPrefix)?
        .as_bytes();
    if line.len() != SHOT_LINE_LEN {
        return Err(ParseError::BadLength {
            expected: SHOT_LINE_LEN,
            actual: line.len(),
        });
    }
    let row = digit(payload[0])? as usize;
    if payload[1] != b'_' {
        return Err(ParseError::BadSeparator);
    }
    let col = digit(payload[2])? as usize;
    if !in_bounds(row, col, BOARD_SIZE) {
        return Err(ParseError::OutOfRange { row, col });
    }
    Ok((row, col))
}

/// `H` or `M` right after the `_BOOM_` prefix marks a shot result.
fn shot_result(payload: &str) -> Option<ShotOutcome> {
    match payload.as_bytes().first() {
        Some(b'H') => Some(ShotOutcome::Hit),
        Some(b'M') => Some(ShotOutcome::Miss),
        _ => None,
    }
}

fn parse_checksum_digits(payload: &str) -> Result<Checksum, ParseError> {
    let bytes = payload.as_bytes();
    if bytes.len() != BOARD_SIZE {
        return Err(ParseError::BadLength {
            expected: BOARD_SIZE,
            actual: bytes.len(),
        });
    }
    let mut counts = [0u8; BOARD_SIZE];
    for (count, &b) in counts.iter_mut().zip(bytes) {
        *count = digit(b)?;
    }
    Ok(Checksum::from_counts(counts))
}

fn digit(b: u8) -> Result<u8, ParseError> {
    if b.is_ascii_digit() {
        Ok(b - b'0')
    } else {
        Err(ParseError::NotADigit(b as char))
    }
}

fn digit_char(value: usize) -> Result<char, EncodeError> {
    if value <= 9 {
        Ok((b'0' + value as u8) as char)
    } else {
        Err(EncodeError::FieldTooWide { value })
    }
}

fn push_digits(values: &[u8], out: &mut String) -> Result<(), EncodeError> {
    for &v in values {
        out.push(digit_char(v as usize)?);
    }
    Ok(())
}

fn push_shot(prefix: &str, (row, col): Coord, out: &mut String) -> Result<(), EncodeError> {
    out.push_str(prefix);
    out.push(digit_char(row)?);
    out.push('_');
    out.push(digit_char(col)?);
    Ok(())
}

fn push_result(prefix: &str, outcome: ShotOutcome, out: &mut String) {
    out.push_str(prefix);
    out.push(match outcome {
        ShotOutcome::Hit => 'H',
        ShotOutcome::Miss => 'M',
    });
}
