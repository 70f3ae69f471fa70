use argh::FromArgs;
use std::path::PathBuf;

use crackdepth::labels::{rename_labels_in_dir, RenameConfig};

#[derive(FromArgs)]
/// Rename the object labels of every VOC annotation in a directory, in place
struct Args {
    /// directory holding the xml annotations
    #[argh(option, short = 'd')]
    dir: PathBuf,

    /// label to replace
    #[argh(option)]
    old: String,

    /// replacement label
    #[argh(option)]
    new: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let config = RenameConfig::new(args.old, args.new);
    let summary = rename_labels_in_dir(&args.dir, &config)?;

    log::info!(
        "Renamed {} labels in {} of {} files",
        summary.replaced,
        summary.changed,
        summary.files
    );

    Ok(())
}
