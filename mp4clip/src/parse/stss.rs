#![allow(missing_docs)]

use bytes::{BufMut, BytesMut};

use crate::error::Result;

use super::error::ParseResultExt;
use super::{Entries, FourCC, FullBoxHeader, ParseBox, ParseError, ParsedBox};

/// The sync-sample table: 1-based sample numbers of the key frames, strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StssBox {
    pub header: FullBoxHeader,
    pub entries: Entries<u32>,
}

const NAME: FourCC = FourCC::STSS;

impl ParseBox for StssBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        Ok(Self {
            header: FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?,
            entries: Entries::parse(buf).while_parsing_field(NAME, "entries")?,
        })
    }
}

impl ParsedBox for StssBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + self.entries.encoded_len()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        self.entries.put_buf(&mut out);
    }
}
