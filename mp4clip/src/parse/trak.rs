#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::{MissingRequiredBox, ParseResultExt, WhileParsingBox};
use super::mp4box::{parse_child, put_child};
use super::{BoxHeader, EdtsBox, FourCC, MdiaBox, Mp4Box, ParseBox, ParseError, ParsedBox, StblBox, TkhdBox};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrakBox {
    pub tkhd: TkhdBox,
    pub edts: Option<EdtsBox>,
    pub mdia: MdiaBox,
}

const NAME: FourCC = FourCC::TRAK;

impl TrakBox {
    /// The track's sample table.
    pub fn stbl(&self) -> &StblBox {
        &self.mdia.minf.stbl
    }

    /// The track's sample table, mutably.
    pub fn stbl_mut(&mut self) -> &mut StblBox {
        &mut self.mdia.minf.stbl
    }
}

impl ParseBox for TrakBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let mut tkhd = None;
        let mut edts = None;
        let mut mdia = None;
        while buf.has_remaining() {
            let header = BoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
            let mut data = header.take_data(buf)?;
            match header.box_type() {
                FourCC::TKHD => put_child(&mut tkhd, parse_child(&mut data, NAME)?, NAME, FourCC::TKHD)?,
                FourCC::EDTS => put_child(&mut edts, parse_child(&mut data, NAME)?, NAME, FourCC::EDTS)?,
                FourCC::MDIA => put_child(&mut mdia, parse_child(&mut data, NAME)?, NAME, FourCC::MDIA)?,
                other => bail_attach!(ParseError::UnknownBoxType(other), WhileParsingBox(NAME)),
            }
        }
        let required = |fourcc| report_attach!(ParseError::BadFormat, MissingRequiredBox(fourcc), WhileParsingBox(NAME));
        Ok(Self {
            tkhd: tkhd.ok_or_else(|| required(FourCC::TKHD))?,
            edts,
            mdia: mdia.ok_or_else(|| required(FourCC::MDIA))?,
        })
    }
}

impl ParsedBox for TrakBox {
    fn encoded_len(&self) -> u64 {
        let mut len = self.tkhd.encoded_size();
        if let Some(edts) = &self.edts {
            len += edts.encoded_size();
        }
        len + self.mdia.encoded_size()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.tkhd.put_box(&mut out);
        if let Some(edts) = &self.edts {
            edts.put_box(&mut out);
        }
        self.mdia.put_box(&mut out);
    }
}
