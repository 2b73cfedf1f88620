#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::ParseResultExt;
use super::{Entries, FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

/// The sample-to-chunk table: each entry starts a run of chunks sharing a sample count and sample
/// description, running until the next entry's `first_chunk`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StscBox {
    pub header: FullBoxHeader,
    pub entries: Entries<StscEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StscEntry {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_id: u32,
}

const NAME: FourCC = FourCC::STSC;

impl ParseBox for StscBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        Ok(Self {
            header: FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?,
            entries: Entries::parse(buf).while_parsing_field(NAME, "entries")?,
        })
    }
}

impl ParsedBox for StscBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + self.entries.encoded_len()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        self.entries.put_buf(&mut out);
    }
}

impl Mp4Prim for StscEntry {
    const ENCODED_LEN: u64 = 12;

    fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        Ok(Self {
            first_chunk: u32::parse(&mut buf)?,
            samples_per_chunk: u32::parse(&mut buf)?,
            sample_description_id: u32::parse(&mut buf)?,
        })
    }

    fn put_buf<B: BufMut>(&self, mut buf: B) {
        self.first_chunk.put_buf(&mut buf);
        self.samples_per_chunk.put_buf(&mut buf);
        self.sample_description_id.put_buf(&mut buf);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let stsc = StscBox {
            header: Default::default(),
            entries: vec![
                StscEntry { first_chunk: 1, samples_per_chunk: 4, sample_description_id: 1 },
                StscEntry { first_chunk: 3, samples_per_chunk: 2, sample_description_id: 1 },
            ]
            .into(),
        };
        let mut buf = BytesMut::new();
        stsc.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, stsc.encoded_len());
        assert_eq!(StscBox::parse(&mut buf).unwrap(), stsc);
    }
}
