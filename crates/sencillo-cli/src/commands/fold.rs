//! Single-sample wave-fold diagnostic.

use clap::Args;
use sencillo_effects::WaveFolder;

#[derive(Args)]
pub struct FoldArgs {
    /// Input sample value
    #[arg(allow_negative_numbers = true)]
    sample: f32,

    /// Fold threshold (> 0)
    #[arg(allow_negative_numbers = true)]
    threshold: f32,
}

pub fn run(args: FoldArgs) -> anyhow::Result<()> {
    let mut folder = WaveFolder::new();
    folder.set_threshold(args.threshold)?;
    println!("{}", folder.fold(args.sample));
    Ok(())
}
