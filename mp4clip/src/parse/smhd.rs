#![allow(missing_docs)]

use bytes::{BufMut, BytesMut};
use fixed::types::I8F8;

use crate::error::Result;

use super::error::ParseResultExt;
use super::{FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SmhdBox {
    pub header: FullBoxHeader,
    /// Stereo balance, a signed 8.8 fixed-point value; 0 is centred.
    pub balance: I8F8,
    reserved: u16,
}

const NAME: FourCC = FourCC::SMHD;

impl ParseBox for SmhdBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        Ok(Self {
            header: FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?,
            balance: I8F8::parse(&mut *buf).while_parsing_field(NAME, "balance")?,
            reserved: u16::parse(&mut *buf).while_parsing_field(NAME, "reserved")?,
        })
    }
}

impl ParsedBox for SmhdBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + 4
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        self.balance.put_buf(&mut out);
        out.put_u16(self.reserved);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let smhd = SmhdBox { balance: I8F8::from_num(-1), ..Default::default() };
        let mut buf = BytesMut::new();
        smhd.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, smhd.encoded_len());
        assert_eq!(SmhdBox::parse(&mut buf).unwrap(), smhd);
    }
}
