//! Read an ISO base media (MP4) stream, rewrite its metadata, and re-emit it. In particular,
//! [`clip`](filter::clip) a movie to a time range without touching the encoded media.
//!
//! The box codec decodes `ftyp` and the full `moov` tree into typed values; the `mdat` payload is
//! never buffered, only streamed. Only the 32-bit box layout is supported: no `co64`, no
//! `moof`/`mfra` fragmenting, `ftyp` first, `moov` before `mdat`.
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! # fn main() -> Result<(), mp4clip::Error> {
//! let input = BufReader::new(File::open("in.mp4")?);
//! let output = BufWriter::new(File::create("out.mp4")?);
//! let mp4 = mp4clip::Mp4::read(input)?;
//! // Keep the 4 seconds starting at second 3.
//! mp4.write_filtered(output, mp4clip::filter::clip(3, 4))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

#[macro_use]
pub mod error;
pub mod filter;
pub mod parse;
mod util;

use std::io::{self, Read, Write};

use bytes::BytesMut;

use filter::Filter;
use parse::error::{ParseResultExt, WhileParsingBox};
use parse::{BoxHeader, FourCC, FtypBox, MdatBox, MoovBox, Mp4Box, ParseBox, ParseError};

pub use error::{Error, Report};
pub use filter::{clip, noop};

/// A decoded MP4: the `ftyp` and `moov` trees, plus a cursor over the `mdat` payload.
///
/// The input reader is held inside, positioned at the first `mdat` payload byte; writing the
/// movie back out consumes it linearly, exactly once.
#[derive(Debug)]
pub struct Mp4<R> {
    /// The file-type box, re-emitted verbatim.
    pub ftyp: FtypBox,
    /// The movie metadata tree.
    pub moov: MoovBox,
    /// The media-data box header; the payload stays on the reader.
    pub mdat: MdatBox,
    data: R,
}

impl<R: Read> Mp4<R> {
    /// Decode a movie's metadata from `input`, leaving it positioned at the `mdat` payload.
    ///
    /// The stream must hold `ftyp`, then `moov`, then `mdat`; unknown boxes between `moov` and
    /// `mdat` (`free` and friends) are skipped. Reaching the end of the stream without finding
    /// an `mdat` fails with [`ParseError::MissingMdat`].
    pub fn read(mut input: R) -> Result<Self, Error> {
        let mut pos = 0u64;

        let header = match read_box_header(&mut input)? {
            Some(header) => header,
            None => bail_attach!(ParseError::TruncatedHeader, "empty input"),
        };
        ensure_attach!(
            header.box_type() == FourCC::FTYP,
            ParseError::BadFormat,
            "ftyp is not the first box",
            WhileParsingBox(header.box_type()),
        );
        let ftyp: FtypBox = read_box_data(&mut input, &header)?;
        log::info!("ftyp @ 0x{pos:08x}: {size} bytes", size = header.box_size());
        pos += header.box_size();

        let header = match read_box_header(&mut input)? {
            Some(header) => header,
            None => bail_attach!(ParseError::TruncatedHeader, "input ends after ftyp"),
        };
        ensure_attach!(
            header.box_type() == FourCC::MOOV,
            ParseError::BadFormat,
            "moov does not follow ftyp",
            WhileParsingBox(header.box_type()),
        );
        let moov: MoovBox = read_box_data(&mut input, &header)?;
        log::info!("moov @ 0x{pos:08x}: {size} bytes", size = header.box_size());
        pos += header.box_size();

        loop {
            let header = match read_box_header(&mut input)? {
                Some(header) => header,
                None => bail_attach!(ParseError::MissingMdat, "input ends before mdat"),
            };
            if header.box_type() == FourCC::MDAT {
                log::info!("mdat @ 0x{pos:08x}: {size} bytes", size = header.box_size());
                let mdat = MdatBox { content_size: header.data_size() as u32 };
                return Ok(Self { ftyp, moov, mdat, data: input });
            }
            log::info!(
                "{fourcc} @ 0x{pos:08x}: {size} bytes (skipped)",
                fourcc = header.box_type(),
                size = header.box_size(),
            );
            let skipped = io::copy(&mut (&mut input).take(header.data_size()), &mut io::sink())?;
            if skipped != header.data_size() {
                bail_attach!(ParseError::MissingMdat, "input ends before mdat", WhileParsingBox(header.box_type()));
            }
            pos += header.box_size();
        }
    }

    /// Re-encode the movie unchanged.
    pub fn write<W: Write>(self, out: W) -> Result<(), Error> {
        self.write_filtered(out, noop())
    }

    /// Re-encode the movie through `filter`: `ftyp` verbatim, then the filtered `moov`, then the
    /// filtered `mdat` payload.
    ///
    /// On error the sink may hold partial output, which is the caller's to discard.
    pub fn write_filtered<W: Write, F: Filter>(self, mut out: W, mut filter: F) -> Result<(), Error> {
        let Self { ftyp, mut moov, mdat, data } = self;
        out.write_all(&ftyp.to_bytes())?;
        filter.filter_moov(&mut moov)?;
        out.write_all(&moov.to_bytes())?;
        filter.filter_mdat(&mut out, mdat, data)
    }
}

fn read_box_header<R: Read>(input: &mut R) -> Result<Option<BoxHeader>, Error> {
    let mut buf = [0u8; BoxHeader::ENCODED_LEN as usize];
    let mut read = 0;
    while read < buf.len() {
        match input.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    match read {
        0 => Ok(None),
        n if n == buf.len() => Ok(Some(BoxHeader::parse(&buf[..])?)),
        _ => Err(report_attach!(ParseError::TruncatedHeader, "short read at box header").into()),
    }
}

fn read_box_data<R: Read, T: ParseBox>(input: &mut R, header: &BoxHeader) -> Result<T, Error> {
    let mut data = BytesMut::zeroed(header.data_size() as usize);
    input.read_exact(&mut data)?;
    let parsed = T::parse(&mut data).while_parsing_box(header.box_type())?;
    ensure_attach!(
        data.is_empty(),
        ParseError::BadFormat,
        "extra unparsed box data",
        WhileParsingBox(header.box_type()),
    );
    Ok(parsed)
}
