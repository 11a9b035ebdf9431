use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "wa-restore", version, about = "Restore the capture date of exported WhatsApp images from their file names")]
struct Cli {
    /// Directory containing the exported media files
    #[arg(short, long)]
    directory: PathBuf,

    /// Overwrite the modified time of each restored file
    #[arg(short, long)]
    last_modified: bool,

    /// Rewrite the EXIF capture dates (DateTimeOriginal, DateTimeDigitized)
    #[arg(short, long)]
    exif_date: bool,

    /// Mutate the originals instead of writing copies into restored/
    #[arg(long)]
    in_place: bool,

    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let options = warestore_core::RestoreOptions {
        directory: cli.directory,
        set_exif_date: cli.exif_date,
        set_modified_time: cli.last_modified,
        in_place: cli.in_place,
    };

    let report = warestore_core::restore_directory(&options)?;

    eprintln!(
        "Done! {} file(s): {} restored, {} partial, {} skipped, {} untouched",
        report.total(),
        report.applied(),
        report.partial(),
        report.skipped(),
        report.untouched()
    );

    Ok(())
}
