#![allow(missing_docs)]

use bytes::BufMut;

use super::{BoxHeader, FourCC};

/// The media-data box.
///
/// Only the header is modelled; the payload stays behind on the input reader, positioned at the
/// first payload byte, and is streamed through [`Filter::filter_mdat`](crate::filter::Filter).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MdatBox {
    pub content_size: u32,
}

impl MdatBox {
    /// Write the 8-byte `mdat` header for a payload of `content_size` bytes.
    pub fn put_header<B: BufMut>(&self, mut out: B) {
        BoxHeader::with_u32_data_size(FourCC::MDAT, self.content_size).put_buf(&mut out);
    }
}
