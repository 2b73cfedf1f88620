#![allow(missing_docs)]

use bytes::{BufMut, BytesMut};

use crate::error::Result;

use super::error::ParseResultExt;
use super::{FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VmhdBox {
    pub header: FullBoxHeader,
    pub graphics_mode: u16,
    pub op_color: [u16; 3],
}

const NAME: FourCC = FourCC::VMHD;

impl ParseBox for VmhdBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        Ok(Self {
            header: FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?,
            graphics_mode: u16::parse(&mut *buf).while_parsing_field(NAME, "graphics_mode")?,
            op_color: <[u16; 3]>::parse(&mut *buf).while_parsing_field(NAME, "op_color")?,
        })
    }
}

impl ParsedBox for VmhdBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + 8
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        out.put_u16(self.graphics_mode);
        self.op_color.put_buf(&mut out);
    }
}
