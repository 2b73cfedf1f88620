#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};
use derive_more::{Deref, DerefMut};

use crate::error::Result;

use super::error::{ParseResultExt, WhileParsingType};
use super::{Mp4Prim, ParseError};

/// An entry table prefixed by a 32-bit entry count, as used by all of the `st*` boxes.
#[derive(Clone, Debug, PartialEq, Eq, Deref, DerefMut)]
pub struct Entries<T>(Vec<T>);

impl<T: Mp4Prim> Entries<T> {
    pub fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let entry_count = u32::parse(&mut *buf).while_parsing_type::<Self>()?;
        let entries_len = T::ENCODED_LEN * entry_count as u64;
        ensure_attach!(
            buf.remaining() as u64 >= entries_len,
            ParseError::BadFormat,
            "entry count overruns box data",
            WhileParsingType::new::<Self>(),
        );
        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            entries.push(T::parse(&mut *buf)?);
        }
        Ok(Self(entries))
    }

    pub fn encoded_len(&self) -> u64 {
        u32::ENCODED_LEN + self.0.len() as u64 * T::ENCODED_LEN
    }

    pub fn put_buf<B: BufMut>(&self, mut out: B) {
        out.put_u32(self.0.len() as u32);
        for entry in &self.0 {
            entry.put_buf(&mut out);
        }
    }
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for Entries<T> {
    fn from(entries: Vec<T>) -> Self {
        Self(entries)
    }
}

impl<T> FromIterator<T> for Entries<T> {
    fn from_iter<I: IntoIterator<Item = T>>(entries: I) -> Self {
        Self(entries.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Entries<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let entries: Entries<u32> = vec![1, 2, 3].into();
        let mut buf = BytesMut::new();
        entries.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, entries.encoded_len());
        assert_eq!(Entries::<u32>::parse(&mut buf).unwrap(), entries);
    }

    #[test]
    fn empty() {
        let mut buf = BytesMut::new();
        Entries::<u32>::default().put_buf(&mut buf);
        assert_eq!(&buf[..], b"\x00\x00\x00\x00");
        assert_eq!(Entries::<u32>::parse(&mut buf).unwrap(), Entries::default());
    }

    #[test]
    fn count_overruns_data() {
        let mut buf = BytesMut::from(&b"\x00\x00\x00\x02\x00\x00\x00\x01"[..]);
        let err = Entries::<u32>::parse(&mut buf).unwrap_err();
        assert!(matches!(err.get_ref(), ParseError::BadFormat), "{err}");
    }
}
