use std::path::PathBuf;

use crate::score_store::{DEFAULT_SCORE_FILE, ScoreStore};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BestArg {
    /// File holding the persisted best scores
    #[arg(long, default_value = DEFAULT_SCORE_FILE)]
    score_file: PathBuf,
}

pub(crate) fn run(arg: &BestArg) -> anyhow::Result<()> {
    let BestArg { score_file } = arg;
    let best = ScoreStore::new(score_file).load()?;
    println!("{best}");
    Ok(())
}
