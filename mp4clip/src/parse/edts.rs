#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::{MissingRequiredBox, ParseResultExt, WhileParsingBox};
use super::mp4box::{parse_child, put_child};
use super::{BoxHeader, ElstBox, FourCC, Mp4Box, ParseBox, ParseError, ParsedBox};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdtsBox {
    pub elst: ElstBox,
}

const NAME: FourCC = FourCC::EDTS;

impl ParseBox for EdtsBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let mut elst = None;
        while buf.has_remaining() {
            let header = BoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
            let mut data = header.take_data(buf)?;
            match header.box_type() {
                FourCC::ELST => put_child(&mut elst, parse_child(&mut data, NAME)?, NAME, FourCC::ELST)?,
                other => bail_attach!(ParseError::UnknownBoxType(other), WhileParsingBox(NAME)),
            }
        }
        let elst = elst.ok_or_else(|| {
            report_attach!(ParseError::BadFormat, MissingRequiredBox(FourCC::ELST), WhileParsingBox(NAME))
        })?;
        Ok(Self { elst })
    }
}

impl ParsedBox for EdtsBox {
    fn encoded_len(&self) -> u64 {
        self.elst.encoded_size()
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.elst.put_box(&mut out);
    }
}
