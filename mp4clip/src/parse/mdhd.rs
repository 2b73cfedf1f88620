#![allow(missing_docs)]

use bytes::{BufMut, BytesMut};

use crate::error::Result;

use super::error::{ParseResultExt, WhereEq, WhileParsingBox};
use super::{FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MdhdBox {
    pub header: FullBoxHeader,
    pub creation_time: u32,
    pub modification_time: u32,
    pub timescale: u32,
    pub duration: u32,
    /// 1-bit padding plus the 15-bit packed ISO-639-2 language code.
    pub language: u16,
    pub quality: u16,
}

const NAME: FourCC = FourCC::MDHD;

impl ParseBox for MdhdBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let header = FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
        ensure_attach!(
            header.version == 0,
            ParseError::BadFormat,
            "version 1 media headers are not supported",
            WhereEq("version", header.version),
            WhileParsingBox(NAME),
        );
        Ok(Self {
            header,
            creation_time: u32::parse(&mut *buf).while_parsing_field(NAME, "creation_time")?,
            modification_time: u32::parse(&mut *buf).while_parsing_field(NAME, "modification_time")?,
            timescale: u32::parse(&mut *buf).while_parsing_field(NAME, "timescale")?,
            duration: u32::parse(&mut *buf).while_parsing_field(NAME, "duration")?,
            language: u16::parse(&mut *buf).while_parsing_field(NAME, "language")?,
            quality: u16::parse(&mut *buf).while_parsing_field(NAME, "quality")?,
        })
    }
}

impl ParsedBox for MdhdBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + 20
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        out.put_u32(self.creation_time);
        out.put_u32(self.modification_time);
        out.put_u32(self.timescale);
        out.put_u32(self.duration);
        out.put_u16(self.language);
        out.put_u16(self.quality);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    impl MdhdBox {
        pub(crate) fn dummy(timescale: u32, duration: u32) -> Self {
            Self {
                header: Default::default(),
                creation_time: 0,
                modification_time: 0,
                timescale,
                duration,
                language: 0x55c4, // "und"
                quality: 0,
            }
        }
    }

    #[test]
    fn roundtrip() {
        let mdhd = MdhdBox::dummy(90_000, 900_000);
        let mut buf = BytesMut::new();
        mdhd.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, mdhd.encoded_len());
        assert_eq!(MdhdBox::parse(&mut buf).unwrap(), mdhd);
    }
}
