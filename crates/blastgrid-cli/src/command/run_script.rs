use std::path::PathBuf;

use blastgrid_engine::{GameSession, PieceSeed, try_apply};
use rand::Rng as _;

use crate::{
    schema::report::{ScriptReport, SessionSnapshot},
    score_store::ScoreStore,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunScriptArg {
    /// JSON file with a list of commands
    script: PathBuf,
    /// Piece generator seed as 8 hex digits (random when omitted)
    #[arg(long, value_parser = util::parse_seed)]
    seed: Option<PieceSeed>,
    /// Seed the best score from this file and save a new best to it
    #[arg(long)]
    score_file: Option<PathBuf>,
}

pub(crate) fn run(arg: &RunScriptArg) -> anyhow::Result<()> {
    let RunScriptArg {
        script,
        seed,
        score_file,
    } = arg;

    let commands = util::read_script_file(script)?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let store = score_file.as_ref().map(ScoreStore::new);

    let mut session = GameSession::with_seed(seed);
    if let Some(store) = &store {
        session.set_loaded_score(store.load()?);
    }

    let mut events = Vec::new();
    let mut rejected = 0;
    for command in commands {
        match try_apply(&mut session, command) {
            Ok(produced) => events.extend(produced),
            Err(error) => {
                tracing::debug!(?command, %error, "command rejected");
                rejected += 1;
            }
        }
    }

    if let Some(store) = &store {
        store.record_if_better(session.stats().best_score())?;
    }

    let report = ScriptReport {
        seed,
        rejected,
        events,
        snapshot: SessionSnapshot::new(&session),
    };
    Output::save_json(&report, None)?;
    Ok(())
}
