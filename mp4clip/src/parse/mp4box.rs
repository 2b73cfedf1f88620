use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::{MultipleBoxes, ParseResultExt, WhileParsingChild};
use super::{BoxHeader, FourCC, ParseError};

/// A box type whose body can be decoded from a length-limited buffer.
pub trait ParseBox: Sized {
    /// The four-character code identifying this box type.
    const NAME: FourCC;

    /// Parse the box body, consuming all of `buf`.
    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError>;
}

/// A decoded box which can be re-encoded.
pub trait ParsedBox {
    /// The encoded length of the box body, excluding the header.
    fn encoded_len(&self) -> u64;

    /// Write the box body, excluding the header.
    fn put_buf(&self, out: &mut dyn BufMut);
}

/// Whole-box operations derived from [`ParseBox`] + [`ParsedBox`].
pub trait Mp4Box: ParseBox + ParsedBox {
    /// The total encoded size of the box, header included.
    fn encoded_size(&self) -> u64 {
        BoxHeader::ENCODED_LEN + self.encoded_len()
    }

    /// Write the whole box, header included.
    fn put_box<B: BufMut>(&self, mut out: B) {
        debug_assert!(self.encoded_size() <= u32::MAX as u64);
        BoxHeader::with_u32_data_size(Self::NAME, self.encoded_len() as u32).put_buf(&mut out);
        self.put_buf(&mut out);
    }

    /// Encode the whole box to a fresh buffer.
    fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.encoded_size() as usize);
        self.put_box(&mut buf);
        buf
    }
}

impl<T: ParseBox + ParsedBox> Mp4Box for T {}

/// Parse one child box body and require it to consume its declared size exactly.
pub(crate) fn parse_child<T: ParseBox>(data: &mut BytesMut, parent: FourCC) -> Result<T, ParseError> {
    let parsed = T::parse(data).while_parsing_child(parent, T::NAME)?;
    ensure_attach!(
        !data.has_remaining(),
        ParseError::BadFormat,
        "extra unparsed box data",
        WhileParsingChild(parent, T::NAME),
    );
    Ok(parsed)
}

/// Store a just-parsed child, rejecting duplicates of a box type that may occur only once.
pub(crate) fn put_child<T>(
    slot: &mut Option<T>,
    value: T,
    parent: FourCC,
    child: FourCC,
) -> Result<(), ParseError> {
    ensure_attach!(
        slot.is_none(),
        ParseError::BadFormat,
        MultipleBoxes(child),
        WhileParsingChild(parent, child),
    );
    *slot = Some(value);
    Ok(())
}
