#![allow(missing_docs)]

use bytes::{BufMut, BytesMut};
use fixed::types::{I16F16, I8F8};

use crate::error::Result;

use super::error::{ParseResultExt, WhereEq, WhileParsingBox};
use super::{FourCC, FullBoxHeader, Mp4Prim, ParseBox, ParseError, ParsedBox};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TkhdBox {
    pub header: FullBoxHeader,
    pub creation_time: u32,
    pub modification_time: u32,
    pub track_id: u32,
    reserved: u32,
    pub duration: u32,
    reserved_2: [u32; 2],
    pub layer: u16,
    pub alternate_group: i16,
    pub volume: I8F8,
    reserved_3: u16,
    pub matrix: [u32; 9],
    pub width: I16F16,
    pub height: I16F16,
}

const NAME: FourCC = FourCC::TKHD;

impl ParseBox for TkhdBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let header = FullBoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
        ensure_attach!(
            header.version == 0,
            ParseError::BadFormat,
            "version 1 track headers are not supported",
            WhereEq("version", header.version),
            WhileParsingBox(NAME),
        );
        Ok(Self {
            header,
            creation_time: u32::parse(&mut *buf).while_parsing_field(NAME, "creation_time")?,
            modification_time: u32::parse(&mut *buf).while_parsing_field(NAME, "modification_time")?,
            track_id: u32::parse(&mut *buf).while_parsing_field(NAME, "track_id")?,
            reserved: u32::parse(&mut *buf).while_parsing_field(NAME, "reserved")?,
            duration: u32::parse(&mut *buf).while_parsing_field(NAME, "duration")?,
            reserved_2: <[u32; 2]>::parse(&mut *buf).while_parsing_field(NAME, "reserved_2")?,
            layer: u16::parse(&mut *buf).while_parsing_field(NAME, "layer")?,
            alternate_group: i16::parse(&mut *buf).while_parsing_field(NAME, "alternate_group")?,
            volume: I8F8::parse(&mut *buf).while_parsing_field(NAME, "volume")?,
            reserved_3: u16::parse(&mut *buf).while_parsing_field(NAME, "reserved_3")?,
            matrix: <[u32; 9]>::parse(&mut *buf).while_parsing_field(NAME, "matrix")?,
            width: I16F16::parse(&mut *buf).while_parsing_field(NAME, "width")?,
            height: I16F16::parse(&mut *buf).while_parsing_field(NAME, "height")?,
        })
    }
}

impl ParsedBox for TkhdBox {
    fn encoded_len(&self) -> u64 {
        FullBoxHeader::ENCODED_LEN + 80
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        self.header.put_buf(&mut out);
        out.put_u32(self.creation_time);
        out.put_u32(self.modification_time);
        out.put_u32(self.track_id);
        out.put_u32(self.reserved);
        out.put_u32(self.duration);
        self.reserved_2.put_buf(&mut out);
        out.put_u16(self.layer);
        out.put_i16(self.alternate_group);
        self.volume.put_buf(&mut out);
        out.put_u16(self.reserved_3);
        self.matrix.put_buf(&mut out);
        self.width.put_buf(&mut out);
        self.height.put_buf(&mut out);
    }
}
