//! The clip engine: restrict a movie to `[begin, begin + duration)` without re-encoding.
//!
//! `filter_moov` rewrites every track's sample tables to cover only the requested range and
//! plans which chunks of the original `mdat` survive; `filter_mdat` then streams exactly those
//! chunks. Chunks are never split: a chunk straddling a cut point is kept whole, so the output
//! may carry a small pre- and post-roll.

use std::io::{self, Read, Write};
use std::mem::take;
use std::time::Duration;

use bytes::BytesMut;
use log::debug;

use crate::error::Error;
use crate::parse::{CttsEntry, MdatBox, MoovBox, Mp4Box, StscEntry, SttsEntry, TrakBox};
use crate::util::{duration_to_ticks, ticks_to_duration};

use super::{ClipError, Filter};

/// Clip a movie to `[begin, begin + duration)`, both in whole seconds.
///
/// A `duration` of 0, or one reaching past the end of the movie, clips to the end of the movie.
/// Errors surface from the filter's first operation: a negative `begin` or one past the end of
/// the movie as [`ClipError::ClipOutside`], a negative `duration` as
/// [`ClipError::InvalidDuration`].
pub fn clip(begin: i64, duration: i64) -> ClipFilter {
    let state = if duration < 0 {
        State::Failed(ClipError::InvalidDuration)
    } else if begin < 0 {
        State::Failed(ClipError::ClipOutside)
    } else {
        State::New
    };
    let begin = Duration::from_secs(begin.max(0) as u64);
    let end = begin + Duration::from_secs(duration.max(0) as u64);
    ClipFilter { begin, end, mdat_size: 0, chunks: Vec::new(), state }
}

/// See [`clip`].
#[derive(Debug)]
pub struct ClipFilter {
    begin: Duration,
    end: Duration,
    mdat_size: u32,
    chunks: Vec<Chunk>,
    state: State,
}

#[derive(Clone, Debug)]
enum State {
    New,
    Planned,
    Done,
    Failed(ClipError),
}

/// One chunk of one track, annotated with the media time range it covers.
///
/// `first_sample`/`last_sample` are 1-based and inclusive; `first_tc` is the start time of the
/// first sample and `last_tc` the end time of the last one.
#[derive(Debug)]
struct Chunk {
    track: usize,
    index: u32,
    first_tc: Duration,
    last_tc: Duration,
    description_id: u32,
    old_offset: u32,
    samples: Vec<u32>,
    first_sample: u32,
    last_sample: u32,
    skip: bool,
}

impl Chunk {
    fn size(&self) -> u32 {
        self.samples.iter().sum()
    }
}

impl Filter for ClipFilter {
    fn filter_moov(&mut self, moov: &mut MoovBox) -> Result<(), Error> {
        match &self.state {
            State::New => {}
            State::Failed(err) => return Err(err.clone().into()),
            _ => return Err(ClipError::InvalidState.into()),
        }
        match self.plan(moov) {
            Ok(()) => {
                self.state = State::Planned;
                Ok(())
            }
            Err(err) => {
                self.state = State::Failed(err.clone());
                Err(err.into())
            }
        }
    }

    fn filter_mdat<W: Write, R: Read>(&mut self, mut out: W, mut mdat: MdatBox, mut data: R) -> Result<(), Error> {
        match &self.state {
            State::Planned => {}
            State::Failed(err) => return Err(err.clone().into()),
            _ => return Err(ClipError::InvalidState.into()),
        }
        match self.stream(&mut out, &mut mdat, &mut data) {
            Ok(()) => {
                self.state = State::Done;
                Ok(())
            }
            Err(err) => {
                self.state = State::Failed(match &err {
                    Error::Clip(err) => err.clone(),
                    _ => ClipError::InvalidState,
                });
                Err(err)
            }
        }
    }
}

impl ClipFilter {
    fn plan(&mut self, moov: &mut MoovBox) -> Result<(), ClipError> {
        let movie_duration = ticks_to_duration(moov.mvhd.duration as u64, moov.mvhd.timescale);
        if self.begin > movie_duration {
            return Err(ClipError::ClipOutside);
        }
        if self.end > movie_duration || self.end == self.begin {
            self.end = movie_duration;
        }
        debug!(
            "clipping [{begin:?}, {end:?}] out of {movie_duration:?}",
            begin = self.begin,
            end = self.end,
        );

        let old_size = moov.encoded_size();
        self.chunks.clear();
        for (track, trak) in moov.traks.iter_mut().enumerate() {
            self.build_chunk_list(track, trak);
            let range = self.mark_surviving_chunks(track);
            debug!("track {track}: keeping samples {range:?}");
            update_sample_tables(trak, range);
            self.rebuild_chunk_tables(track, trak);
        }
        self.update_durations(moov);
        self.chunks.sort_by_key(|chunk| chunk.old_offset);

        let delta = moov.encoded_size() as i64 - old_size as i64;
        self.mdat_size = self.update_chunk_offsets(moov, delta)?;
        Ok(())
    }

    /// Walk `stco`, resolving each chunk's sample numbers, sizes and media time range against
    /// `stsc`, `stsz` and `stts`.
    fn build_chunk_list(&mut self, track: usize, trak: &TrakBox) {
        let stbl = trak.stbl();
        let timescale = trak.mdia.mdhd.timescale;
        let mut run = 0usize;
        let mut sample = 0u64;
        for (i, &old_offset) in stbl.stco.entries.iter().enumerate() {
            let index = i as u32 + 1;
            if run + 1 < stbl.stsc.entries.len() && index >= stbl.stsc.entries[run + 1].first_chunk {
                run += 1;
            }
            let (samples_per_chunk, description_id) = match stbl.stsc.entries.get(run) {
                Some(entry) => (entry.samples_per_chunk, entry.sample_description_id),
                None => (0, 1),
            };
            let first_sample = sample as u32 + 1;
            let first_tc = stbl.stts.time_code(first_sample, timescale);
            let mut samples = Vec::with_capacity(samples_per_chunk as usize);
            for _ in 0..samples_per_chunk {
                samples.push(stbl.stsz.size_of(sample as u32 + 1));
                sample += 1;
            }
            let last_sample = sample as u32;
            let last_tc = stbl.stts.time_code(last_sample + 1, timescale);
            self.chunks.push(Chunk {
                track,
                index,
                first_tc,
                last_tc,
                description_id,
                old_offset,
                samples,
                first_sample,
                last_sample,
                skip: false,
            });
        }
    }

    /// Mark the chunks of `track` falling entirely outside `[begin, end]` as skipped, and return
    /// the 1-based inclusive range of samples the surviving chunks hold, or `None` when none
    /// survive.
    ///
    /// Deriving the sample range from chunk survival keeps the two consistent even when a cut
    /// lands exactly on a chunk edge, or when `end` reaches past the end of a track shorter than
    /// the movie.
    fn mark_surviving_chunks(&mut self, track: usize) -> Option<(u32, u32)> {
        let (begin, end) = (self.begin, self.end);
        let mut first = 0u32;
        let mut last = 0u32;
        for chunk in self.chunks.iter_mut().filter(|chunk| chunk.track == track) {
            if chunk.first_tc > end || chunk.last_tc < begin {
                chunk.skip = true;
                continue;
            }
            if first == 0 {
                first = chunk.first_sample;
            }
            last = chunk.last_sample;
        }
        (first > 0 && last >= first).then_some((first, last))
    }

    /// Rebuild `stsc` from the surviving chunks and resize `stco` to match, so that the new
    /// `moov` size can be measured before the offsets themselves are known.
    fn rebuild_chunk_tables(&mut self, track: usize, trak: &mut TrakBox) {
        let mut entries: Vec<StscEntry> = Vec::new();
        let mut index = 0u32;
        let mut run = None;
        for chunk in self.chunks.iter().filter(|chunk| chunk.track == track && !chunk.skip) {
            index += 1;
            if run != Some((chunk.samples.len(), chunk.description_id)) {
                entries.push(StscEntry {
                    first_chunk: index,
                    samples_per_chunk: chunk.samples.len() as u32,
                    sample_description_id: chunk.description_id,
                });
                run = Some((chunk.samples.len(), chunk.description_id));
            }
        }
        let stbl = trak.stbl_mut();
        stbl.stsc.entries = entries.into();
        stbl.stco.entries = vec![0u32; index as usize].into();
    }

    /// Recompute per-track and movie durations from the surviving chunks' time ranges.
    fn update_durations(&self, moov: &mut MoovBox) {
        let timescale = moov.mvhd.timescale;
        moov.mvhd.duration = 0;
        for (track, trak) in moov.traks.iter_mut().enumerate() {
            let mut span: Option<(Duration, Duration)> = None;
            for chunk in self.chunks.iter().filter(|chunk| chunk.track == track && !chunk.skip) {
                span = Some(match span {
                    None => (chunk.first_tc, chunk.last_tc),
                    Some((start, end)) => (start.min(chunk.first_tc), end.max(chunk.last_tc)),
                });
            }
            let span = span.map_or(Duration::ZERO, |(start, end)| end - start);
            trak.mdia.mdhd.duration = duration_to_ticks(span, trak.mdia.mdhd.timescale);
            trak.tkhd.duration = duration_to_ticks(span, timescale);
            moov.mvhd.duration = moov.mvhd.duration.max(trak.tkhd.duration);
        }
    }

    /// Assign new `stco` offsets, packing surviving chunks contiguously in global `old_offset`
    /// order. Returns the new `mdat` content size.
    ///
    /// The anchor is the first chunk of the old `mdat` whether or not it survives: the new
    /// payload starts where the old one did, displaced only by the change in `moov` size.
    fn update_chunk_offsets(&self, moov: &mut MoovBox, delta: i64) -> Result<u32, ClipError> {
        let delta = i32::try_from(delta).map_err(|_| ClipError::OffsetOverflow)?;
        let base = match self.chunks.first() {
            Some(first) => first.old_offset.checked_add_signed(delta).ok_or(ClipError::OffsetOverflow)?,
            None => 0,
        };
        let mut next = vec![0usize; moov.traks.len()];
        let mut size = 0u32;
        for chunk in self.chunks.iter().filter(|chunk| !chunk.skip) {
            let offset = base.checked_add(size).ok_or(ClipError::OffsetOverflow)?;
            debug!(
                "chunk {index}/track {track} ({old} -> {offset}, {size} bytes)",
                index = chunk.index,
                track = chunk.track,
                old = chunk.old_offset,
                size = chunk.size(),
            );
            let stco = &mut moov.traks[chunk.track].stbl_mut().stco;
            stco.entries[next[chunk.track]] = offset;
            next[chunk.track] += 1;
            size = size.checked_add(chunk.size()).ok_or(ClipError::OffsetOverflow)?;
        }
        Ok(size)
    }

    fn stream<W: Write, R: Read>(&self, out: &mut W, mdat: &mut MdatBox, data: &mut R) -> Result<(), Error> {
        mdat.content_size = self.mdat_size;
        let mut header = BytesMut::with_capacity(8);
        mdat.put_header(&mut header);
        out.write_all(&header)?;

        let largest = self.chunks.iter().map(Chunk::size).max().unwrap_or(0);
        let mut buffer = vec![0u8; largest as usize];
        // The chunks are sorted by old offset, which is the on-disk order, so one linear pass
        // over the payload visits every chunk exactly once.
        for chunk in &self.chunks {
            let chunk_data = &mut buffer[..chunk.size() as usize];
            data.read_exact(chunk_data).map_err(|err| match err.kind() {
                io::ErrorKind::UnexpectedEof => Error::Clip(ClipError::TruncatedChunk),
                _ => Error::Io(err),
            })?;
            if chunk.skip {
                debug!("skipping chunk {index} (track {track})", index = chunk.index, track = chunk.track);
                continue;
            }
            out.write_all(chunk_data).map_err(|err| match err.kind() {
                io::ErrorKind::WriteZero => Error::Clip(ClipError::TruncatedChunk),
                _ => Error::Io(err),
            })?;
        }
        Ok(())
    }
}

/// Rewrite `stts`, `stss`, `stsz` and `ctts` to cover only the 1-based inclusive sample `range`.
fn update_sample_tables(trak: &mut TrakBox, range: Option<(u32, u32)>) {
    let stbl = trak.stbl_mut();

    let old_stts = take(&mut stbl.stts.entries);
    stbl.stts.entries = clip_runs(
        old_stts.iter().map(|entry| (entry.sample_count, entry.sample_delta)),
        range,
    )
    .map(|(sample_count, sample_delta)| SttsEntry { sample_count, sample_delta })
    .collect();

    if let Some(stss) = &mut stbl.stss {
        let old = take(&mut stss.entries);
        stss.entries = match range {
            Some((first, last)) => old
                .iter()
                .copied()
                .filter(|&sample| sample >= first && sample <= last)
                .map(|sample| sample - first + 1)
                .collect(),
            None => Default::default(),
        };
    }

    if stbl.stsz.sample_size == 0 {
        let old = take(&mut stbl.stsz.sizes);
        stbl.stsz.sizes = match range {
            Some((first, last)) => {
                let lo = (first as usize - 1).min(old.len());
                let hi = (last as usize).min(old.len());
                old[lo..hi].to_vec()
            }
            None => Vec::new(),
        };
        stbl.stsz.sample_count = stbl.stsz.sizes.len() as u32;
    } else {
        stbl.stsz.sample_count = range.map_or(0, |(first, last)| last - first + 1);
    }

    if let Some(ctts) = &mut stbl.ctts {
        let old = take(&mut ctts.entries);
        ctts.entries = clip_runs(
            old.iter().map(|entry| (entry.sample_count, entry.sample_offset)),
            range,
        )
        .map(|(sample_count, sample_offset)| CttsEntry { sample_count, sample_offset })
        .collect();
    }
}

/// Clip a run-length table of `(sample_count, value)` pairs to the sample `range` by interval
/// intersection, dropping runs that fall entirely outside it.
fn clip_runs(
    runs: impl Iterator<Item = (u32, u32)>,
    range: Option<(u32, u32)>,
) -> impl Iterator<Item = (u32, u32)> {
    let (first, last) = range.unwrap_or((1, 0));
    let mut sample = 0u64;
    runs.filter_map(move |(count, value)| {
        let lo = sample.max(first as u64 - 1);
        let hi = (sample + count as u64).min(last as u64);
        sample += count as u64;
        (hi > lo).then_some(((hi - lo) as u32, value))
    })
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use crate::parse::{MdatBox, MoovBox};
    use crate::util::test::init_logger;

    use super::*;

    fn clipped(runs: &[(u32, u32)], range: Option<(u32, u32)>) -> Vec<(u32, u32)> {
        clip_runs(runs.iter().copied(), range).collect()
    }

    #[test]
    fn run_clipping_intersects_intervals() {
        let runs = [(2, 100), (3, 50)];
        // Middle of the table, crossing the run boundary.
        assert_eq!(clipped(&runs, Some((2, 4))), [(1, 100), (2, 50)]);
        // Everything.
        assert_eq!(clipped(&runs, Some((1, 5))), [(2, 100), (3, 50)]);
        // A single sample on each side of the boundary.
        assert_eq!(clipped(&runs, Some((2, 2))), [(1, 100)]);
        assert_eq!(clipped(&runs, Some((3, 3))), [(1, 50)]);
        // Range reaching past the table clamps.
        assert_eq!(clipped(&runs, Some((5, 9))), [(1, 50)]);
        // No samples survive.
        assert_eq!(clipped(&runs, None), []);
    }

    #[test]
    fn begin_past_movie_end_is_outside() {
        init_logger();

        // The dummy movie is 1 second long.
        let mut moov = MoovBox::dummy();
        let err = clip(100, 10).filter_moov(&mut moov).unwrap_err();
        assert!(matches!(err, Error::Clip(ClipError::ClipOutside)), "{err}");
    }

    #[test]
    fn negative_bounds_are_rejected() {
        init_logger();

        let mut moov = MoovBox::dummy();
        let err = clip(-1, 4).filter_moov(&mut moov).unwrap_err();
        assert!(matches!(err, Error::Clip(ClipError::ClipOutside)), "{err}");

        let mut moov = MoovBox::dummy();
        let err = clip(0, -4).filter_moov(&mut moov).unwrap_err();
        assert!(matches!(err, Error::Clip(ClipError::InvalidDuration)), "{err}");
    }

    #[test]
    fn mdat_before_moov_is_rejected() {
        init_logger();

        let mut filter = clip(0, 0);
        let err = filter
            .filter_mdat(Vec::new(), MdatBox { content_size: 0 }, Cursor::new(&[][..]))
            .unwrap_err();
        assert!(matches!(err, Error::Clip(ClipError::InvalidState)), "{err}");
    }

    #[test]
    fn failed_filter_keeps_rejecting() {
        init_logger();

        let mut moov = MoovBox::dummy();
        let mut filter = clip(0, -4);
        filter.filter_moov(&mut moov).unwrap_err();
        let err = filter.filter_moov(&mut moov).unwrap_err();
        assert!(matches!(err, Error::Clip(ClipError::InvalidDuration)), "{err}");
        let err = filter
            .filter_mdat(Vec::new(), MdatBox { content_size: 0 }, Cursor::new(&[][..]))
            .unwrap_err();
        assert!(matches!(err, Error::Clip(ClipError::InvalidDuration)), "{err}");
    }

    #[test]
    fn whole_movie_clip_is_identity_on_the_dummy() {
        init_logger();

        // The dummy movie: one track, one chunk at offset 1024, four samples over 1 second.
        let mut moov = MoovBox::dummy();
        let original = moov.clone();
        let mut filter = clip(0, 0);
        filter.filter_moov(&mut moov).unwrap();
        assert_eq!(moov, original);

        let payload = [0x5au8; 100];
        let mut out = Vec::new();
        filter
            .filter_mdat(&mut out, MdatBox { content_size: 100 }, Cursor::new(&payload[..]))
            .unwrap();
        assert_eq!(&out[..8], b"\x00\x00\x00\x6cmdat");
        assert_eq!(&out[8..], &payload[..]);
    }

    #[test]
    fn truncated_payload_is_reported() {
        init_logger();

        let mut moov = MoovBox::dummy();
        let mut filter = clip(0, 0);
        filter.filter_moov(&mut moov).unwrap();

        // The dummy movie's chunk is 100 bytes; offer fewer.
        let payload = [0x5au8; 60];
        let err = filter
            .filter_mdat(Vec::new(), MdatBox { content_size: 100 }, Cursor::new(&payload[..]))
            .unwrap_err();
        assert!(matches!(err, Error::Clip(ClipError::TruncatedChunk)), "{err}");
    }
}
