#![allow(missing_docs)]

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Result;

use super::error::ParseResultExt;
use super::{FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HdlrBox {
    pub header: FullBoxHeader,
    pub pre_defined: u32,
    pub handler_type: FourCC,
    reserved: [u32; 3],
    /// The trailing track name, kept unparsed (encodings vary in the wild).
    name: Bytes,
}

const NAME: FourCC = FourCC::HDLR;

impl ParseBox for HdlrBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let header = FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
        let pre_defined = u32::parse(&mut *buf).while_parsing_field(NAME, "pre_defined")?;
        let handler_type = FourCC::parse(&mut *buf).while_parsing_field(NAME, "handler_type")?;
        let reserved = <[u32; 3]>::parse(&mut *buf).while_parsing_field(NAME, "reserved")?;
        let name = buf.copy_to_bytes(buf.remaining());
        Ok(Self { header, pre_defined, handler_type, reserved, name })
    }
}

impl ParsedBox for HdlrBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + 20 + self.name.len() as u64
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        out.put_u32(self.pre_defined);
        self.handler_type.put_buf(&mut out);
        self.reserved.put_buf(&mut out);
        out.put_slice(&self.name[..]);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    impl HdlrBox {
        pub(crate) fn dummy(handler_type: FourCC) -> Self {
            Self {
                header: Default::default(),
                pre_defined: 0,
                handler_type,
                reserved: [0; 3],
                name: Bytes::from_static(b"\0"),
            }
        }
    }

    #[test]
    fn roundtrip() {
        let hdlr = HdlrBox::dummy(FourCC { value: *b"vide" });
        let mut buf = BytesMut::new();
        hdlr.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, hdlr.encoded_len());
        assert_eq!(HdlrBox::parse(&mut buf).unwrap(), hdlr);
    }
}
