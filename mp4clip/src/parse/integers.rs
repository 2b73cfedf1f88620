#![allow(missing_docs)]

use std::mem::size_of;

use bytes::{Buf, BufMut};
use fixed::types::{I16F16, I8F8};

use crate::error::Result;

use super::error::{ParseResultExt, WhileParsingType};
use super::{FourCC, ParseError};

/// A fixed-width value with a big-endian wire encoding.
pub trait Mp4Prim: Sized {
    const ENCODED_LEN: u64;

    fn parse<B: Buf>(buf: B) -> Result<Self, ParseError>;

    fn put_buf<B: BufMut>(&self, buf: B);
}

macro_rules! mp4_int {
    ($($ty:ty => ($get_fun:ident, $put_fun:ident)),+ $(,)?) => {
        $(impl Mp4Prim for $ty {
            const ENCODED_LEN: u64 = size_of::<Self>() as u64;

            fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
                ensure_attach!(
                    buf.remaining() as u64 >= Self::ENCODED_LEN,
                    ParseError::BadFormat,
                    WhileParsingType::new::<$ty>(),
                );
                Ok(buf.$get_fun())
            }

            fn put_buf<B: BufMut>(&self, mut buf: B) {
                buf.$put_fun(*self)
            }
        })+
    };
}

mp4_int! {
    u8 => (get_u8, put_u8),
    u16 => (get_u16, put_u16),
    u32 => (get_u32, put_u32),
    u64 => (get_u64, put_u64),
    i8 => (get_i8, put_i8),
    i16 => (get_i16, put_i16),
    i32 => (get_i32, put_i32),
    i64 => (get_i64, put_i64),
}

macro_rules! mp4_fixed_point {
    ($($ty:ty => ($bits:ty, $get_fun:ident, $put_fun:ident)),+ $(,)?) => {
        $(impl Mp4Prim for $ty {
            const ENCODED_LEN: u64 = size_of::<$bits>() as u64;

            fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
                ensure_attach!(
                    buf.remaining() as u64 >= Self::ENCODED_LEN,
                    ParseError::BadFormat,
                    WhileParsingType::new::<$ty>(),
                );
                Ok(Self::from_bits(buf.$get_fun()))
            }

            fn put_buf<B: BufMut>(&self, mut buf: B) {
                buf.$put_fun(self.to_bits())
            }
        })+
    };
}

mp4_fixed_point! {
    I8F8 => (i16, get_i16, put_i16),
    I16F16 => (i32, get_i32, put_i32),
}

impl<T: Mp4Prim, const N: usize> Mp4Prim for [T; N]
where
    [T; N]: Default,
{
    const ENCODED_LEN: u64 = T::ENCODED_LEN * N as u64;

    fn parse<B: Buf>(mut buf: B) -> Result<Self, ParseError> {
        ensure_attach!(
            buf.remaining() as u64 >= Self::ENCODED_LEN,
            ParseError::BadFormat,
            WhileParsingType::new::<Self>(),
        );
        let mut parsed: [T; N] = Default::default();
        for value in &mut parsed {
            *value = T::parse(&mut buf)?;
        }
        Ok(parsed)
    }

    fn put_buf<B: BufMut>(&self, mut buf: B) {
        for value in self {
            value.put_buf(&mut buf);
        }
    }
}

impl Mp4Prim for FourCC {
    const ENCODED_LEN: u64 = Self::size();

    fn parse<B: Buf>(buf: B) -> Result<Self, ParseError> {
        Mp4Prim::parse(buf).map(|value| Self { value }).while_parsing_type::<Self>()
    }

    fn put_buf<B: BufMut>(&self, mut buf: B) {
        buf.put(&self.value[..])
    }
}
