#![allow(missing_docs)]

use std::mem::size_of;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Result;

use super::error::{ParseResultExt, WhereEq, WhileParsingField};
use super::{FourCC, Mp4Prim, ParseBox, ParseError, ParsedBox};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtypBox {
    pub major_brand: FourCC,
    pub minor_version: u32,
    compatible_brands: Bytes,
}

const NAME: FourCC = FourCC::FTYP;

impl FtypBox {
    pub fn new(major_brand: FourCC, minor_version: u32, compatible_brands: impl IntoIterator<Item = FourCC>) -> Self {
        let compatible_brands = compatible_brands.into_iter().flat_map(|fourcc| fourcc.value).collect();
        Self { major_brand, minor_version, compatible_brands }
    }

    pub fn compatible_brands(&self) -> impl Iterator<Item = FourCC> + ExactSizeIterator + '_ {
        self.compatible_brands
            .chunks_exact(4)
            .map(|bytes| FourCC { value: bytes.try_into().unwrap() })
    }
}

impl ParseBox for FtypBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let major_brand = FourCC::parse(&mut *buf).while_parsing_field(NAME, "major_brand")?;
        let minor_version = u32::parse(&mut *buf).while_parsing_field(NAME, "minor_version")?;

        ensure_attach!(
            buf.remaining() % FourCC::size() as usize == 0,
            ParseError::BadFormat,
            WhileParsingField(NAME, "compatible_brands"),
            WhereEq("remaining", buf.remaining()),
        );

        let compatible_brands = buf.copy_to_bytes(buf.remaining());

        Ok(Self { major_brand, minor_version, compatible_brands })
    }
}

impl ParsedBox for FtypBox {
    fn encoded_len(&self) -> u64 {
        FourCC::size() + size_of::<u32>() as u64 + self.compatible_brands.len() as u64
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.major_brand.put_buf(&mut out);
        out.put_u32(self.minor_version);
        out.put_slice(&self.compatible_brands[..]);
    }
}

#[cfg(test)]
mod test {
    use crate::parse::Mp4Box;

    use super::*;

    const ISOM: FourCC = FourCC { value: *b"isom" };
    const MP41: FourCC = FourCC { value: *b"mp41" };

    impl FtypBox {
        pub(crate) fn dummy() -> Self {
            Self::new(ISOM, 512, [ISOM, MP41])
        }
    }

    #[test]
    fn roundtrip() {
        let ftyp = FtypBox::dummy();
        let mut buf = BytesMut::new();
        ftyp.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, ftyp.encoded_len());
        assert_eq!(FtypBox::parse(&mut buf).unwrap(), ftyp);
    }

    #[test]
    fn brands() {
        let ftyp = FtypBox::dummy();
        assert_eq!(ftyp.compatible_brands().collect::<Vec<_>>(), [ISOM, MP41]);
        assert_eq!(ftyp.encoded_size(), 8 + 8 + 8);
    }

    #[test]
    fn ragged_brands_rejected() {
        let mut buf = BytesMut::from(&b"isom\x00\x00\x02\x00iso"[..]);
        let err = FtypBox::parse(&mut buf).unwrap_err();
        assert!(matches!(err.get_ref(), ParseError::BadFormat), "{err}");
    }
}
