#![allow(missing_docs)]

use bytes::{BufMut, BytesMut};

use crate::error::Result;

use super::error::{ParseResultExt, WhereEq, WhileParsingField};
use super::{FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

/// The sample-size table.
///
/// When `sample_size` is non-zero every sample shares that size and `sizes` is empty; otherwise
/// `sizes` holds one entry per sample. `sample_count` is authoritative in both cases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StszBox {
    pub header: FullBoxHeader,
    pub sample_size: u32,
    pub sample_count: u32,
    pub sizes: Vec<u32>,
}

const NAME: FourCC = FourCC::STSZ;

impl StszBox {
    /// The size in bytes of the 1-based `sample`.
    pub fn size_of(&self, sample: u32) -> u32 {
        if self.sample_size != 0 {
            return self.sample_size;
        }
        self.sizes.get((sample as usize).wrapping_sub(1)).copied().unwrap_or(0)
    }
}

impl ParseBox for StszBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let header = FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
        let sample_size = u32::parse(&mut *buf).while_parsing_field(NAME, "sample_size")?;
        let sample_count = u32::parse(&mut *buf).while_parsing_field(NAME, "sample_count")?;
        let mut sizes = Vec::new();
        if sample_size == 0 {
            ensure_attach!(
                buf.len() as u64 >= sample_count as u64 * u32::ENCODED_LEN,
                ParseError::BadFormat,
                "sample count overruns box data",
                WhereEq("sample_count", sample_count),
                WhileParsingField(NAME, "sizes"),
            );
            sizes.reserve(sample_count as usize);
            for _ in 0..sample_count {
                sizes.push(u32::parse(&mut *buf)?);
            }
        }
        Ok(Self { header, sample_size, sample_count, sizes })
    }
}

impl ParsedBox for StszBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + 8 + self.sizes.len() as u64 * u32::ENCODED_LEN
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        out.put_u32(self.sample_size);
        out.put_u32(self.sample_count);
        for &size in &self.sizes {
            out.put_u32(size);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip_per_sample() {
        let stsz = StszBox { sample_count: 3, sizes: vec![100, 200, 300], ..Default::default() };
        let mut buf = BytesMut::new();
        stsz.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, stsz.encoded_len());
        assert_eq!(StszBox::parse(&mut buf).unwrap(), stsz);
    }

    #[test]
    fn roundtrip_uniform() {
        let stsz = StszBox { sample_size: 1024, sample_count: 30, ..Default::default() };
        let mut buf = BytesMut::new();
        stsz.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, stsz.encoded_len());
        assert_eq!(StszBox::parse(&mut buf).unwrap(), stsz);
    }

    #[test]
    fn size_of() {
        let uniform = StszBox { sample_size: 1024, sample_count: 30, ..Default::default() };
        assert_eq!(uniform.size_of(1), 1024);
        assert_eq!(uniform.size_of(30), 1024);

        let table = StszBox { sample_count: 2, sizes: vec![100, 200], ..Default::default() };
        assert_eq!(table.size_of(1), 100);
        assert_eq!(table.size_of(2), 200);
        assert_eq!(table.size_of(0), 0);
        assert_eq!(table.size_of(3), 0);
    }
}
