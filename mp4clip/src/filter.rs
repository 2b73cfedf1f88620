//! Filters transforming a movie as it is re-encoded.
//!
//! A filter is invoked in two phases by [`Mp4::write_filtered`](crate::Mp4::write_filtered):
//! first [`filter_moov`](Filter::filter_moov) rewrites the metadata tree, then
//! [`filter_mdat`](Filter::filter_mdat) streams the media payload to the sink.

mod clip;

use std::io::{self, Read, Write};

use bytes::BytesMut;

use crate::error::Error;
use crate::parse::{MdatBox, MoovBox};

pub use clip::{clip, ClipFilter};

/// A transformation applied to a movie while re-encoding it.
pub trait Filter {
    /// Rewrite the movie metadata in place.
    fn filter_moov(&mut self, moov: &mut MoovBox) -> Result<(), Error>;

    /// Write the `mdat` box (header and payload) to `out`, drawing payload bytes from `data`.
    ///
    /// `data` is the input positioned at the first byte of the original `mdat` payload; it is
    /// consumed linearly, exactly once.
    fn filter_mdat<W: Write, R: Read>(&mut self, out: W, mdat: MdatBox, data: R) -> Result<(), Error>;
}

/// Error type returned by the clip engine.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClipError {
    /// The requested clip duration is negative.
    #[error("Invalid clip duration")]
    InvalidDuration,

    /// The requested clip range starts outside the movie.
    #[error("Clip range is outside the movie")]
    ClipOutside,

    /// The `mdat` payload ended mid-chunk, or the sink accepted fewer bytes than offered.
    #[error("Truncated chunk")]
    TruncatedChunk,

    /// A rewritten chunk offset does not fit in the 32-bit `stco` encoding.
    #[error("Chunk offset out of range")]
    OffsetOverflow,

    /// The filter's operations were invoked out of order, or again after a failure.
    #[error("Filter invoked out of order")]
    InvalidState,
}

/// The identity filter: leaves `moov` untouched and copies the `mdat` payload through whole.
pub fn noop() -> NoopFilter {
    NoopFilter {}
}

/// See [`noop`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopFilter {}

impl Filter for NoopFilter {
    fn filter_moov(&mut self, _moov: &mut MoovBox) -> Result<(), Error> {
        Ok(())
    }

    fn filter_mdat<W: Write, R: Read>(&mut self, mut out: W, mdat: MdatBox, data: R) -> Result<(), Error> {
        let mut header = BytesMut::with_capacity(8);
        mdat.put_header(&mut header);
        out.write_all(&header)?;
        let copied = io::copy(&mut data.take(mdat.content_size as u64), &mut out)?;
        if copied != mdat.content_size as u64 {
            return Err(ClipError::TruncatedChunk.into());
        }
        Ok(())
    }
}
