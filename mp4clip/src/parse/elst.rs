#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::ParseResultExt;
use super::{Entries, FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

/// The edit list. Decoded so the media rate fields keep their ISO-specified signedness, but
/// clipping leaves it untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElstBox {
    pub header: FullBoxHeader,
    pub entries: Entries<ElstEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElstEntry {
    pub segment_duration: u32,
    pub media_time: u32,
    pub media_rate_integer: i16,
    pub media_rate_fraction: i16,
}

const NAME: FourCC = FourCC::ELST;

impl ParseBox for ElstBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        Ok(Self {
            header: FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?,
            entries: Entries::parse(buf).while_parsing_field(NAME, "entries")?,
        })
    }
}

impl ParsedBox for ElstBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + self.entries.encoded_len()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        self.entries.put_buf(&mut out);
    }
}

impl Mp4Prim for ElstEntry {
    const ENCODED_LEN: u64 = 12;

    fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        Ok(Self {
            segment_duration: u32::parse(&mut buf)?,
            media_time: u32::parse(&mut buf)?,
            media_rate_integer: i16::parse(&mut buf)?,
            media_rate_fraction: i16::parse(&mut buf)?,
        })
    }

    fn put_buf<B: BufMut>(&self, mut buf: B) {
        self.segment_duration.put_buf(&mut buf);
        self.media_time.put_buf(&mut buf);
        self.media_rate_integer.put_buf(&mut buf);
        self.media_rate_fraction.put_buf(&mut buf);
    }
}
