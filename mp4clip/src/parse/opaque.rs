//! Boxes carried as uninterpreted byte blobs.
//!
//! These box types are irrelevant to clipping; their bodies round-trip byte-exact.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Result;

use super::{FourCC, ParseBox, ParseError, ParsedBox};

macro_rules! opaque_box {
    ($(#[$doc:meta])* $ty:ident, $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $ty {
            data: Bytes,
        }

        impl $ty {
            #[allow(dead_code)]
            pub fn data(&self) -> &[u8] {
                &self.data
            }
        }

        impl ParseBox for $ty {
            const NAME: FourCC = FourCC::$name;

            fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
                Ok(Self { data: buf.copy_to_bytes(buf.remaining()) })
            }
        }

        impl ParsedBox for $ty {
            fn encoded_len(&self) -> u64 {
                self.data.len() as u64
            }

            fn put_buf(&self, out: &mut dyn BufMut) {
                out.put_slice(&self.data[..]);
            }
        }
    };
}

opaque_box! {
    /// The object-descriptor box.
    IodsBox, IODS
}

opaque_box! {
    /// The user-data box, children (`meta`, …) included.
    UdtaBox, UDTA
}

opaque_box! {
    /// The data-information box, its `dref` child included.
    DinfBox, DINF
}

opaque_box! {
    /// The sample-description box; the engine never looks inside sample entries.
    StsdBox, STSD
}
