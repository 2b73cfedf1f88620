#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::{MissingRequiredBox, ParseResultExt, WhileParsingBox};
use super::mp4box::{parse_child, put_child};
use super::{BoxHeader, FourCC, HdlrBox, MdhdBox, MinfBox, Mp4Box, ParseBox, ParseError, ParsedBox};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MdiaBox {
    pub mdhd: MdhdBox,
    pub hdlr: Option<HdlrBox>,
    pub minf: MinfBox,
}

const NAME: FourCC = FourCC::MDIA;

impl ParseBox for MdiaBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let mut mdhd = None;
        let mut hdlr = None;
        let mut minf = None;
        while buf.has_remaining() {
            let header = BoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
            let mut data = header.take_data(buf)?;
            match header.box_type() {
                FourCC::MDHD => put_child(&mut mdhd, parse_child(&mut data, NAME)?, NAME, FourCC::MDHD)?,
                FourCC::HDLR => put_child(&mut hdlr, parse_child(&mut data, NAME)?, NAME, FourCC::HDLR)?,
                FourCC::MINF => put_child(&mut minf, parse_child(&mut data, NAME)?, NAME, FourCC::MINF)?,
                other => bail_attach!(ParseError::UnknownBoxType(other), WhileParsingBox(NAME)),
            }
        }
        let required = |fourcc| report_attach!(ParseError::BadFormat, MissingRequiredBox(fourcc), WhileParsingBox(NAME));
        Ok(Self {
            mdhd: mdhd.ok_or_else(|| required(FourCC::MDHD))?,
            hdlr,
            minf: minf.ok_or_else(|| required(FourCC::MINF))?,
        })
    }
}

impl ParsedBox for MdiaBox {
    fn encoded_len(&self) -> u64 {
        let mut len = self.mdhd.encoded_size();
        if let Some(hdlr) = &self.hdlr {
            len += hdlr.encoded_size();
        }
        len + self.minf.encoded_size()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.mdhd.put_box(&mut out);
        if let Some(hdlr) = &self.hdlr {
            hdlr.put_box(&mut out);
        }
        self.minf.put_box(&mut out);
    }
}
