#![allow(missing_docs)]

use bytes::{BufMut, BytesMut};

use crate::error::Result;

use super::error::ParseResultExt;
use super::{Entries, FourCC, FullBoxHeader, ParseBox, ParseError, ParsedBox};

/// The chunk-offset table: one absolute file byte offset per chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StcoBox {
    pub header: FullBoxHeader,
    pub entries: Entries<u32>,
}

const NAME: FourCC = FourCC::STCO;

impl ParseBox for StcoBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        Ok(Self {
            header: FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?,
            entries: Entries::parse(buf).while_parsing_field(NAME, "entries")?,
        })
    }
}

impl ParsedBox for StcoBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + self.entries.encoded_len()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        self.entries.put_buf(&mut out);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let stco = StcoBox { header: Default::default(), entries: vec![4096, 8192, 12_288].into() };
        let mut buf = BytesMut::new();
        stco.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, stco.encoded_len());
        assert_eq!(StcoBox::parse(&mut buf).unwrap(), stco);
    }
}
