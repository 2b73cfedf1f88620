#![allow(missing_docs)]

use bytes::{Buf, BufMut, Bytes, BytesMut};
use fixed::types::{I16F16, I8F8};

use crate::error::Result;

use super::error::{ParseResultExt, WhereEq, WhileParsingBox};
use super::{FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

/// The movie header. Fields past `volume` (reserved words, matrix, predefined words and
/// `next_track_id`) are not interpreted and round-trip as an opaque tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MvhdBox {
    pub header: FullBoxHeader,
    pub creation_time: u32,
    pub modification_time: u32,
    pub timescale: u32,
    pub duration: u32,
    pub rate: I16F16,
    pub volume: I8F8,
    rest: Bytes,
}

const NAME: FourCC = FourCC::MVHD;

impl ParseBox for MvhdBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let header = FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
        ensure_attach!(
            header.version == 0,
            ParseError::BadFormat,
            "version 1 movie headers are not supported",
            WhereEq("version", header.version),
            WhileParsingBox(NAME),
        );
        let creation_time = u32::parse(&mut *buf).while_parsing_field(NAME, "creation_time")?;
        let modification_time = u32::parse(&mut *buf).while_parsing_field(NAME, "modification_time")?;
        let timescale = u32::parse(&mut *buf).while_parsing_field(NAME, "timescale")?;
        let duration = u32::parse(&mut *buf).while_parsing_field(NAME, "duration")?;
        let rate = I16F16::parse(&mut *buf).while_parsing_field(NAME, "rate")?;
        let volume = I8F8::parse(&mut *buf).while_parsing_field(NAME, "volume")?;
        let rest = buf.copy_to_bytes(buf.remaining());
        Ok(Self { header, creation_time, modification_time, timescale, duration, rate, volume, rest })
    }
}

impl ParsedBox for MvhdBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + 22 + self.rest.len() as u64
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        out.put_u32(self.creation_time);
        out.put_u32(self.modification_time);
        out.put_u32(self.timescale);
        out.put_u32(self.duration);
        self.rate.put_buf(&mut out);
        self.volume.put_buf(&mut out);
        out.put_slice(&self.rest[..]);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    impl MvhdBox {
        pub(crate) fn dummy(timescale: u32, duration: u32) -> Self {
            Self {
                header: Default::default(),
                creation_time: 0,
                modification_time: 0,
                timescale,
                duration,
                rate: I16F16::from_num(1),
                volume: I8F8::from_num(1),
                rest: Bytes::from_static(&[0; 82]),
            }
        }
    }

    #[test]
    fn roundtrip() {
        let mvhd = MvhdBox::dummy(1000, 10_000);
        let mut buf = BytesMut::new();
        mvhd.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, mvhd.encoded_len());
        assert_eq!(MvhdBox::parse(&mut buf).unwrap(), mvhd);
    }

    #[test]
    fn version_1_rejected() {
        let mvhd = MvhdBox { header: FullBoxHeader { version: 1, flags: 0 }, ..MvhdBox::dummy(1000, 0) };
        let mut buf = BytesMut::new();
        mvhd.put_buf(&mut buf);
        let err = MvhdBox::parse(&mut buf).unwrap_err();
        assert!(matches!(err.get_ref(), ParseError::BadFormat), "{err}");
    }
}
