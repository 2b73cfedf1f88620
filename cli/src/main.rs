use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser as _;

use mp4clip::Mp4;

#[derive(clap::Parser)]
struct Args {
    /// Start of the clip, in whole seconds.
    #[clap(long, short = 's', default_value_t = 0)]
    start: i64,

    /// Duration of the clip, in whole seconds; 0 clips to the end of the movie.
    #[clap(long, short = 'd', default_value_t = 0)]
    duration: i64,

    /// Path to the movie to read.
    input: PathBuf,

    /// Path to write the result to.
    ///
    /// If not specified, the input is only decoded and summarised.
    output: Option<PathBuf>,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .context("Error initializing logging")?;

    let args = Args::try_parse().context("Error parsing command line arguments")?;

    let input = File::open(&args.input).context("Error opening input file")?;
    let mp4 = Mp4::read(BufReader::new(input)).context("Error parsing mp4 file")?;

    let mvhd = &mp4.moov.mvhd;
    log::info!(
        "movie: {duration} units at {timescale} units/s, {tracks} track(s)",
        duration = mvhd.duration,
        timescale = mvhd.timescale,
        tracks = mp4.moov.traks.len(),
    );

    let Some(output) = &args.output else {
        return Ok(());
    };
    let mut out = BufWriter::new(File::create(output).context("Error creating output file")?);

    if args.start != 0 || args.duration != 0 {
        mp4.write_filtered(&mut out, mp4clip::clip(args.start, args.duration))
    } else {
        mp4.write(&mut out)
    }
    .context("Error writing output file")?;

    out.flush().context("Error writing output file")?;
    Ok(())
}
