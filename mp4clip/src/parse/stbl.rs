#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::{MissingRequiredBox, ParseResultExt, WhileParsingBox};
use super::mp4box::{parse_child, put_child};
use super::{
    BoxHeader, CttsBox, FourCC, Mp4Box, ParseBox, ParseError, ParsedBox, StcoBox, StscBox, StsdBox, StssBox, StszBox,
    SttsBox,
};

/// The sample table: the per-track indices the clip engine rewrites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StblBox {
    pub stsd: StsdBox,
    pub stts: SttsBox,
    pub stss: Option<StssBox>,
    pub stsc: StscBox,
    pub stsz: StszBox,
    pub stco: StcoBox,
    pub ctts: Option<CttsBox>,
}

const NAME: FourCC = FourCC::STBL;

impl ParseBox for StblBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let mut stsd = None;
        let mut stts = None;
        let mut stss = None;
        let mut stsc = None;
        let mut stsz = None;
        let mut stco = None;
        let mut ctts = None;
        while buf.has_remaining() {
            let header = BoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
            let mut data = header.take_data(buf)?;
            match header.box_type() {
                FourCC::STSD => put_child(&mut stsd, parse_child(&mut data, NAME)?, NAME, FourCC::STSD)?,
                FourCC::STTS => put_child(&mut stts, parse_child(&mut data, NAME)?, NAME, FourCC::STTS)?,
                FourCC::STSS => put_child(&mut stss, parse_child(&mut data, NAME)?, NAME, FourCC::STSS)?,
                FourCC::STSC => put_child(&mut stsc, parse_child(&mut data, NAME)?, NAME, FourCC::STSC)?,
                FourCC::STSZ => put_child(&mut stsz, parse_child(&mut data, NAME)?, NAME, FourCC::STSZ)?,
                FourCC::STCO => put_child(&mut stco, parse_child(&mut data, NAME)?, NAME, FourCC::STCO)?,
                FourCC::CTTS => put_child(&mut ctts, parse_child(&mut data, NAME)?, NAME, FourCC::CTTS)?,
                other => bail_attach!(ParseError::UnknownBoxType(other), WhileParsingBox(NAME)),
            }
        }
        let required = |fourcc| report_attach!(ParseError::BadFormat, MissingRequiredBox(fourcc), WhileParsingBox(NAME));
        Ok(Self {
            stsd: stsd.ok_or_else(|| required(FourCC::STSD))?,
            stts: stts.ok_or_else(|| required(FourCC::STTS))?,
            stss,
            stsc: stsc.ok_or_else(|| required(FourCC::STSC))?,
            stsz: stsz.ok_or_else(|| required(FourCC::STSZ))?,
            stco: stco.ok_or_else(|| required(FourCC::STCO))?,
            ctts,
        })
    }
}

impl ParsedBox for StblBox {
    fn encoded_len(&self) -> u64 {
        let mut len = self.stsd.encoded_size() + self.stts.encoded_size();
        if let Some(stss) = &self.stss {
            len += stss.encoded_size();
        }
        len += self.stsc.encoded_size() + self.stsz.encoded_size() + self.stco.encoded_size();
        if let Some(ctts) = &self.ctts {
            len += ctts.encoded_size();
        }
        len
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.stsd.put_box(&mut out);
        self.stts.put_box(&mut out);
        if let Some(stss) = &self.stss {
            stss.put_box(&mut out);
        }
        self.stsc.put_box(&mut out);
        self.stsz.put_box(&mut out);
        self.stco.put_box(&mut out);
        if let Some(ctts) = &self.ctts {
            ctts.put_box(&mut out);
        }
    }
}
