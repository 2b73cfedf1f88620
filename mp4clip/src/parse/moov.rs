#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::{MissingRequiredBox, ParseResultExt, WhileParsingBox};
use super::mp4box::{parse_child, put_child};
use super::{BoxHeader, FourCC, IodsBox, Mp4Box, MvhdBox, ParseBox, ParseError, ParsedBox, TrakBox, UdtaBox};

/// The movie box: the metadata tree the clip engine rewrites.
///
/// Children re-encode in canonical order: `mvhd`, `iods`, the `trak`s, `udta`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoovBox {
    pub mvhd: MvhdBox,
    pub iods: Option<IodsBox>,
    pub traks: Vec<TrakBox>,
    pub udta: Option<UdtaBox>,
}

const NAME: FourCC = FourCC::MOOV;

impl ParseBox for MoovBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let mut mvhd = None;
        let mut iods = None;
        let mut traks = Vec::new();
        let mut udta = None;
        while buf.has_remaining() {
            let header = BoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
            let mut data = header.take_data(buf)?;
            match header.box_type() {
                FourCC::MVHD => put_child(&mut mvhd, parse_child(&mut data, NAME)?, NAME, FourCC::MVHD)?,
                FourCC::IODS => put_child(&mut iods, parse_child(&mut data, NAME)?, NAME, FourCC::IODS)?,
                FourCC::TRAK => traks.push(parse_child(&mut data, NAME)?),
                FourCC::UDTA => put_child(&mut udta, parse_child(&mut data, NAME)?, NAME, FourCC::UDTA)?,
                other => bail_attach!(ParseError::UnknownBoxType(other), WhileParsingBox(NAME)),
            }
        }
        let mvhd = mvhd.ok_or_else(|| {
            report_attach!(ParseError::BadFormat, MissingRequiredBox(FourCC::MVHD), WhileParsingBox(NAME))
        })?;
        Ok(Self { mvhd, iods, traks, udta })
    }
}

impl ParsedBox for MoovBox {
    fn encoded_len(&self) -> u64 {
        let mut len = self.mvhd.encoded_size();
        if let Some(iods) = &self.iods {
            len += iods.encoded_size();
        }
        for trak in &self.traks {
            len += trak.encoded_size();
        }
        if let Some(udta) = &self.udta {
            len += udta.encoded_size();
        }
        len
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.mvhd.put_box(&mut out);
        if let Some(iods) = &self.iods {
            iods.put_box(&mut out);
        }
        for trak in &self.traks {
            trak.put_box(&mut out);
        }
        if let Some(udta) = &self.udta {
            udta.put_box(&mut out);
        }
    }
}
