use serde::{Deserialize, Serialize};

use crate::{
    ActionError,
    core::{
        line_clear::{Cell, LineClear},
        piece::{Direction, Placement, Position},
    },
};

use super::{
    game_session::{ActivePlacement, FinalizeOutcome, GameSession},
    hand::{HAND_SIZE, HandPiece},
};

/// An input to a [`GameSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Command {
    /// Starts a new game, keeping the loaded best score.
    Reset,
    /// Takes the selected piece from the hand onto the board.
    Spawn,
    /// Moves the active piece one cell.
    Move(Direction),
    /// Commits the active piece.
    Finalize,
    /// Returns the active piece to the hand.
    Cancel,
    SelectSlot(usize),
    SetLoadedScore(u32),
    /// Spawns when nothing is active, finalizes otherwise.
    Place,
    /// Moves the active piece, or steps the hand cursor with `Up`/`Down`
    /// when nothing is active.
    Navigate(Direction),
}

/// Something that happened while applying a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Event {
    Reset,
    HandRefilled {
        pieces: [Option<HandPiece>; HAND_SIZE],
    },
    Spawned {
        active: ActivePlacement,
    },
    Moved {
        position: Position,
    },
    Placed {
        placement: Placement,
        piece: HandPiece,
        score: u32,
    },
    /// Full lines were cleared; `clear` carries the animation frames.
    LinesCleared {
        clear: LineClear,
        bonus: u32,
    },
    CellCleared(Cell),
    Cancelled {
        piece: HandPiece,
        slot: usize,
    },
    SelectionChanged {
        slot: usize,
    },
    BestScoreUpdated {
        best_score: u32,
    },
    GameOver {
        score: u32,
    },
}

/// Applies a command and reports what happened.
///
/// A rejected command leaves the session untouched and yields no events.
///
/// # Example
///
/// ```
/// use blastgrid_engine::{Command, Direction, Event, GameSession, PieceSeed, apply};
///
/// let mut session = GameSession::with_seed(PieceSeed::from(1));
///
/// let events = apply(&mut session, Command::Spawn);
/// assert!(matches!(events[..], [Event::Spawned { .. }]));
///
/// // Already moving a piece
/// assert!(apply(&mut session, Command::Spawn).is_empty());
///
/// let events = apply(&mut session, Command::Move(Direction::Down));
/// assert!(matches!(events[..], [Event::Moved { .. }]));
/// ```
pub fn apply(session: &mut GameSession, command: Command) -> Vec<Event> {
    match try_apply(session, command) {
        Ok(events) => events,
        Err(error) => {
            tracing::trace!(?command, %error, "command rejected");
            Vec::new()
        }
    }
}

/// Like [`apply`], but reports why a command was rejected.
pub fn try_apply(session: &mut GameSession, command: Command) -> Result<Vec<Event>, ActionError> {
    let mut events = Vec::new();
    match command {
        Command::Reset => {
            session.reset();
            events.push(Event::Reset);
            events.push(hand_refilled(session));
        }
        Command::Spawn => spawn(session, &mut events)?,
        Command::Move(direction) => {
            let position = session.try_move(direction)?;
            events.push(Event::Moved { position });
        }
        Command::Finalize => finalize(session, &mut events)?,
        Command::Cancel => {
            let active = session.try_cancel()?;
            events.push(Event::Cancelled {
                piece: active.piece,
                slot: session.hand().selection(),
            });
        }
        Command::SelectSlot(index) => {
            let before = session.hand().selection();
            let slot = session.try_select_slot(index)?;
            if slot != before {
                events.push(Event::SelectionChanged { slot });
            }
        }
        Command::SetLoadedScore(score) => {
            let best_score = session.set_loaded_score(score);
            events.push(Event::BestScoreUpdated { best_score });
        }
        Command::Place => {
            if session.active().is_some() {
                finalize(session, &mut events)?;
            } else {
                spawn(session, &mut events)?;
            }
        }
        Command::Navigate(direction) => {
            if session.active().is_some() {
                let position = session.try_move(direction)?;
                events.push(Event::Moved { position });
            } else {
                let before = session.hand().selection();
                let slot = session.try_step_selection(direction)?;
                if slot != before {
                    events.push(Event::SelectionChanged { slot });
                }
            }
        }
    }
    Ok(events)
}

fn hand_refilled(session: &GameSession) -> Event {
    Event::HandRefilled {
        pieces: *session.hand().slots(),
    }
}

fn spawn(session: &mut GameSession, events: &mut Vec<Event>) -> Result<(), ActionError> {
    let outcome = session.try_spawn()?;
    if outcome.refilled {
        let mut pieces = *session.hand().slots();
        pieces[outcome.active.slot] = Some(outcome.active.piece);
        events.push(Event::HandRefilled { pieces });
    }
    events.push(Event::Spawned {
        active: outcome.active,
    });
    Ok(())
}

fn finalize(session: &mut GameSession, events: &mut Vec<Event>) -> Result<(), ActionError> {
    let FinalizeOutcome {
        placed,
        line_clear,
        line_bonus,
        refilled,
        best_score,
        game_over,
    } = session.try_finalize()?;

    let score = session.stats().score();
    events.push(Event::Placed {
        placement: placed.placement(),
        piece: placed.piece,
        score,
    });
    push_line_clear(events, line_clear, line_bonus);
    if let Some(best_score) = best_score {
        events.push(Event::BestScoreUpdated { best_score });
    }
    if refilled {
        events.push(hand_refilled(session));
    }
    if game_over {
        events.push(Event::GameOver { score });
    }
    Ok(())
}

fn push_line_clear(events: &mut Vec<Event>, clear: LineClear, bonus: u32) {
    if clear.is_empty() {
        return;
    }
    let cells: Vec<_> = clear.cleared_cells().collect();
    events.push(Event::LinesCleared { clear, bonus });
    events.extend(cells.into_iter().map(Event::CellCleared));
}
