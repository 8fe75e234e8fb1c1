//! Interactive learning loop

use seedling_api::{SessionMode, Track, VocabularyItem, MAX_FAMILIARITY};
use seedling_core::{CoreEngine, CoreEvent};
use std::io::{self, BufRead, Write};

const HELP: &str = "k = know, d = don't know, n = next, p = previous, q = quit";

/// How a learning run ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearnSummary {
    pub known: usize,
    pub missed: usize,
    pub completed: bool,
    pub marked: bool,
}

/// Render a familiarity rating as stars
pub fn stars(familiarity: u8) -> String {
    let filled = familiarity.min(MAX_FAMILIARITY) as usize;
    let mut s = "★".repeat(filled);
    s.push_str(&"☆".repeat(MAX_FAMILIARITY as usize - filled));
    s
}

/// Run one session, reading answers line by line from `input`
pub fn run_session<R: BufRead, W: Write>(
    engine: &mut CoreEngine,
    track: Track,
    mode: SessionMode,
    mut input: R,
    out: &mut W,
) -> io::Result<LearnSummary> {
    let mut summary = LearnSummary::default();

    match engine.start_session(track, mode) {
        CoreEvent::SessionEmpty { .. } => {
            match mode {
                SessionMode::New => writeln!(out, "No new {} items to learn.", track)?,
                SessionMode::Review => writeln!(out, "Nothing due for review in {}.", track)?,
            }
            return Ok(summary);
        }
        CoreEvent::SessionStarted { size, .. } => {
            writeln!(out, "{} {} session: {} item(s). {}", track, mode, size, HELP)?;
        }
        _ => {}
    }

    let mut line = String::new();
    loop {
        let Some(item) = engine.current_item() else {
            break;
        };
        let (pos, len) = engine.session().map(|q| q.position()).unwrap_or((0, 0));
        prompt(out, pos, len, &item)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match line.trim() {
            "k" | "know" => {
                summary.known += 1;
                for event in engine.answer(true) {
                    report(out, &event, &mut summary)?;
                }
            }
            "d" | "dont" | "don't" => {
                summary.missed += 1;
                for event in engine.answer(false) {
                    report(out, &event, &mut summary)?;
                }
            }
            "n" | "next" => {
                if !engine.advance() {
                    writeln!(out, "Already at the last item.")?;
                }
            }
            "p" | "prev" => {
                if !engine.retreat() {
                    writeln!(out, "Already at the first item.")?;
                }
            }
            "q" | "quit" => break,
            _ => writeln!(out, "{}", HELP)?,
        }
    }

    if !summary.completed {
        engine.end_session();
    }
    Ok(summary)
}

fn prompt<W: Write>(out: &mut W, pos: usize, len: usize, item: &VocabularyItem) -> io::Result<()> {
    write!(out, "[{}/{}] {}  {} > ", pos, len, item.text, stars(item.familiarity))?;
    out.flush()
}

fn report<W: Write>(out: &mut W, event: &CoreEvent, summary: &mut LearnSummary) -> io::Result<()> {
    match event {
        CoreEvent::ItemGraded {
            known: false,
            next_due_date,
            ..
        } => writeln!(out, "  Again later (due {}).", next_due_date),
        CoreEvent::ItemGraded { next_due_date, .. } => {
            writeln!(out, "  Got it! Next review {}.", next_due_date)
        }
        CoreEvent::SessionCompleted { known, .. } => {
            summary.completed = true;
            writeln!(out, "All done, {} item(s) learned.", known)
        }
        CoreEvent::EngagementMarked { track, .. } => {
            summary.marked = true;
            writeln!(
                out,
                "Today's {} task is finished. Claim your water with `seedling water {}`.",
                track, track
            )
        }
        _ => Ok(()),
    }
}
