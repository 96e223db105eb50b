use std::path::PathBuf;

use blastgrid_engine::{Command, GameSession, PieceSeed, ReachabilityRule, apply};
use chrono::Utc;
use rand::Rng as _;

use crate::{
    bot::{self, Strategy},
    schema::report::{AutoPlayReport, GameReport},
    score_store::{DEFAULT_SCORE_FILE, ScoreStore},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Piece generator seed as 8 hex digits (random when omitted)
    #[arg(long, value_parser = util::parse_seed)]
    seed: Option<PieceSeed>,
    /// Placement strategy (greedy, first)
    #[arg(long, default_value = "greedy")]
    strategy: Strategy,
    /// How game-over is decided (legacy, handonly)
    #[arg(long, default_value = "legacy")]
    rule: ReachabilityRule,
    /// Maximum placements per game
    #[arg(long, default_value_t = 1000)]
    max_turns: usize,
    /// File holding the persisted best scores
    #[arg(long, default_value = DEFAULT_SCORE_FILE)]
    score_file: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        games,
        seed,
        strategy,
        rule,
        max_turns,
        score_file,
        output,
    } = arg;

    let store = ScoreStore::new(score_file);
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let played_at = Utc::now();
    tracing::info!(%seed, %strategy, %rule, games, "starting auto-play");

    let mut session = GameSession::with_seed(seed).with_reachability_rule(*rule);
    apply(&mut session, Command::SetLoadedScore(store.load()?));

    let evaluator = strategy.evaluator();
    let mut reports = Vec::with_capacity(*games);
    for game in 0..*games {
        if game > 0 {
            apply(&mut session, Command::Reset);
        }
        let (outcome, turns) = bot::play_game(&mut session, evaluator, *max_turns)?;
        let stats = session.stats();
        tracing::info!(
            game,
            ?outcome,
            turns,
            score = stats.score(),
            lines = stats.total_cleared_lines(),
            "game finished"
        );
        store.record_if_better(stats.best_score())?;
        reports.push(GameReport {
            game,
            outcome,
            turns,
            final_stats: stats.clone(),
            final_board: *session.board(),
        });
    }

    let report = AutoPlayReport {
        played_at,
        seed,
        strategy: *strategy,
        rule: *rule,
        best_score: session.stats().best_score(),
        games: reports,
    };
    Output::save_json(&report, output.clone())?;
    Ok(())
}
