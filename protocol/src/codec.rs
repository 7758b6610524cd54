//! Length-prefixed binary codec for location packages.
//!
//! Wire format, all fields little-endian:
//!
//! ```text
//! [i32 count][count x (i32 type_hash, f32 x, f32 y, f32 z)]
//! ```
//!
//! There is no version field; both peers must run matching logic.

use nom::IResult;
use nom::number::complete::{le_f32, le_i32};
use tracing::debug;

use crate::error::CodecError;
use crate::types::{LocationRecord, TypeHash, Vec3};

/// Encoded size of one record: i32 hash + 3 x f32 position.
pub const RECORD_SIZE: usize = 16;

/// Serialize records into a flat buffer, ready for transmission.
pub fn encode(records: &[LocationRecord]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + records.len() * RECORD_SIZE);
    buf.extend_from_slice(&(records.len() as i32).to_le_bytes());
    for record in records {
        buf.extend_from_slice(&record.type_hash.raw().to_le_bytes());
        buf.extend_from_slice(&record.position.x.to_le_bytes());
        buf.extend_from_slice(&record.position.y.to_le_bytes());
        buf.extend_from_slice(&record.position.z.to_le_bytes());
    }
    buf
}

/// Read the count prefix and return a lazy record iterator.
///
/// A count of zero yields an empty iterator; callers must treat that as
/// "nothing to composite" and return early.
pub fn decode(input: &[u8]) -> Result<(u32, RecordIter<'_>), CodecError> {
    let (rest, count) =
        le_i32::<_, nom::error::Error<&[u8]>>(input).map_err(|_| CodecError::Truncated {
            context: "record count",
        })?;
    if count < 0 {
        return Err(CodecError::NegativeCount(count));
    }
    debug!(count, "decoding location package");
    Ok((
        count as u32,
        RecordIter {
            rest,
            remaining: count as u32,
        },
    ))
}

/// Decode the whole package at once. Fails atomically: a truncated buffer
/// yields an error and no records.
pub fn decode_all(input: &[u8]) -> Result<Vec<LocationRecord>, CodecError> {
    let (count, records) = decode(input)?;
    // Cap the pre-allocation by what the buffer can actually hold, so a
    // hostile count cannot force a huge allocation before the parse fails.
    let cap = (count as usize).min(input.len() / RECORD_SIZE + 1);
    let mut out = Vec::with_capacity(cap);
    for record in records {
        out.push(record?);
    }
    Ok(out)
}

fn parse_record(input: &[u8]) -> IResult<&[u8], LocationRecord> {
    let (input, hash) = le_i32(input)?;
    let (input, x) = le_f32(input)?;
    let (input, y) = le_f32(input)?;
    let (input, z) = le_f32(input)?;
    Ok((
        input,
        LocationRecord {
            type_hash: TypeHash(hash),
            position: Vec3 { x, y, z },
        },
    ))
}

/// Lazy record iterator over an encoded package body.
///
/// Yields records one at a time; a truncated record yields a single
/// `Err` and then terminates.
#[derive(Debug)]
pub struct RecordIter<'a> {
    rest: &'a [u8],
    remaining: u32,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<LocationRecord, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match parse_record(self.rest) {
            Ok((rest, record)) => {
                self.rest = rest;
                self.remaining -= 1;
                Some(Ok(record))
            }
            Err(_) => {
                self.remaining = 0;
                Some(Err(CodecError::Truncated {
                    context: "record fields",
                }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}
