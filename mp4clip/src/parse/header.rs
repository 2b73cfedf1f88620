#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::{WhereEq, WhileParsingBox};
use super::{FourCC, Mp4Prim, ParseError};

/// The 8-byte `{size, type}` header prefixing every box.
///
/// Only the compact 32-bit form is supported: a size of 0 (until end of file) or 1 (64-bit
/// extended size follows) fails with [`ParseError::UnsupportedBoxSize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxHeader {
    box_type: FourCC,
    box_size: u32,
}

impl BoxHeader {
    pub const ENCODED_LEN: u64 = 8;

    pub(crate) const fn with_u32_data_size(box_type: FourCC, data_size: u32) -> Self {
        Self { box_type, box_size: data_size + Self::ENCODED_LEN as u32 }
    }

    pub fn with_data_size(box_type: FourCC, data_size: u64) -> Result<Self, ParseError> {
        match data_size.checked_add(Self::ENCODED_LEN) {
            Some(box_size) if box_size <= u32::MAX as u64 => {
                Ok(Self { box_type, box_size: box_size as u32 })
            }
            _ => bail_attach!(ParseError::BadFormat, "box size too large", WhileParsingBox(box_type)),
        }
    }

    pub fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        ensure_attach!(
            buf.remaining() as u64 >= Self::ENCODED_LEN,
            ParseError::TruncatedHeader,
            WhereEq("remaining", buf.remaining()),
        );
        let box_size = buf.get_u32();
        let mut box_type = FourCC { value: [0; 4] };
        buf.copy_to_slice(&mut box_type.value);
        match box_size {
            0 | 1 => bail_attach!(
                ParseError::UnsupportedBoxSize,
                WhereEq("size", box_size),
                WhileParsingBox(box_type),
            ),
            2..=7 => bail_attach!(
                ParseError::BadFormat,
                "box size smaller than its header",
                WhereEq("size", box_size),
                WhileParsingBox(box_type),
            ),
            _ => Ok(Self { box_type, box_size }),
        }
    }

    pub const fn box_type(&self) -> FourCC {
        self.box_type
    }

    pub const fn box_size(&self) -> u64 {
        self.box_size as u64
    }

    pub const fn data_size(&self) -> u64 {
        self.box_size as u64 - Self::ENCODED_LEN
    }

    /// Split this box's data off the front of its container's data.
    pub fn take_data(&self, buf: &mut BytesMut) -> Result<BytesMut, ParseError> {
        let data_size = self.data_size() as usize;
        ensure_attach!(
            buf.len() >= data_size,
            ParseError::BadFormat,
            "box data extends past the end of its container",
            WhileParsingBox(self.box_type),
        );
        Ok(buf.split_to(data_size))
    }

    pub fn put_buf<B: BufMut>(&self, mut out: B) {
        out.put_u32(self.box_size);
        self.box_type.put_buf(&mut out);
    }
}

/// The version and flags fields shared by all "full" boxes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FullBoxHeader {
    pub version: u8,
    pub flags: u32,
}

impl FullBoxHeader {
    pub const ENCODED_LEN: u64 = 4;

    pub fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        let version = u8::parse(&mut buf)?;
        let flags = <[u8; 3]>::parse(&mut buf)?;
        let flags = u32::from_be_bytes([0, flags[0], flags[1], flags[2]]);
        Ok(Self { version, flags })
    }

    pub fn put_buf<B: BufMut>(&self, mut out: B) {
        out.put_u8(self.version);
        out.put_uint(self.flags.into(), 3);
    }
}
