#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::ParseResultExt;
use super::{Entries, FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

/// The composition-time-offset table: run-length encoded per-sample composition offsets. Its run
/// boundaries need not line up with `stts`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CttsBox {
    pub header: FullBoxHeader,
    pub entries: Entries<CttsEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CttsEntry {
    pub sample_count: u32,
    pub sample_offset: u32,
}

const NAME: FourCC = FourCC::CTTS;

impl ParseBox for CttsBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        Ok(Self {
            header: FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?,
            entries: Entries::parse(buf).while_parsing_field(NAME, "entries")?,
        })
    }
}

impl ParsedBox for CttsBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + self.entries.encoded_len()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        self.entries.put_buf(&mut out);
    }
}

impl Mp4Prim for CttsEntry {
    const ENCODED_LEN: u64 = 8;

    fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        Ok(Self { sample_count: u32::parse(&mut buf)?, sample_offset: u32::parse(&mut buf)? })
    }

    fn put_buf<B: BufMut>(&self, mut buf: B) {
        self.sample_count.put_buf(&mut buf);
        self.sample_offset.put_buf(&mut buf);
    }
}
