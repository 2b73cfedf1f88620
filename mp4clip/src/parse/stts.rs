#![allow(missing_docs)]

use std::time::Duration;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;
use crate::util::ticks_to_duration;

use super::error::ParseResultExt;
use super::{Entries, FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

/// The decoding-time-to-sample table: run-length encoded per-sample durations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SttsBox {
    pub header: FullBoxHeader,
    pub entries: Entries<SttsEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SttsEntry {
    pub sample_count: u32,
    pub sample_delta: u32,
}

const NAME: FourCC = FourCC::STTS;

impl SttsBox {
    /// The total number of samples described by the table.
    pub fn sample_count(&self) -> u64 {
        self.entries.iter().map(|entry| entry.sample_count as u64).sum()
    }

    /// The media time at which the 1-based `sample` starts.
    ///
    /// `sample` may be one past the last sample, in which case the track's total duration is
    /// returned. Samples further out clamp to that same value.
    pub fn time_code(&self, sample: u32, timescale: u32) -> Duration {
        let mut remaining = sample.saturating_sub(1) as u64;
        let mut ticks = 0u64;
        for entry in &self.entries {
            if remaining == 0 {
                break;
            }
            let count = (entry.sample_count as u64).min(remaining);
            ticks += count * entry.sample_delta as u64;
            remaining -= count;
        }
        ticks_to_duration(ticks, timescale)
    }
}

impl ParseBox for SttsBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        Ok(Self {
            header: FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?,
            entries: Entries::parse(buf).while_parsing_field(NAME, "entries")?,
        })
    }
}

impl ParsedBox for SttsBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + self.entries.encoded_len()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        self.entries.put_buf(&mut out);
    }
}

impl Mp4Prim for SttsEntry {
    const ENCODED_LEN: u64 = 8;

    fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        Ok(Self { sample_count: u32::parse(&mut buf)?, sample_delta: u32::parse(&mut buf)? })
    }

    fn put_buf<B: BufMut>(&self, mut buf: B) {
        self.sample_count.put_buf(&mut buf);
        self.sample_delta.put_buf(&mut buf);
    }
}
