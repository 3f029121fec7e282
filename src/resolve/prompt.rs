//! The disambiguation channel: the one place resolution can block on a
//! human. Implementations decide how a choice among candidates is made;
//! resolvers stay free of terminal concerns.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::resolve::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSlot {
    Fast,
    Charged,
}

impl MoveSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Charged => "charged",
        }
    }
}

/// What is being decided: which species, and which banned move the chosen
/// candidate will replace.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceContext<'a> {
    pub species_id: &'a str,
    pub banned_move: &'a str,
    pub slot: MoveSlot,
}

/// Picks one candidate out of an ordered menu of at least two. Returning
/// `ResolveError::Aborted` cancels the whole session.
pub trait Disambiguator {
    fn choose(
        &mut self,
        context: &ChoiceContext<'_>,
        candidates: &[String],
    ) -> Result<usize, ResolveError>;
}

/// Interactive channel: prints a numbered menu and reprompts until a valid
/// selection arrives. End of input aborts the session.
pub struct TerminalDisambiguator<R, W> {
    input: R,
    output: W,
}

impl TerminalDisambiguator<io::StdinLock<'static>, io::Stderr> {
    /// Reads selections from stdin and prompts on stderr, keeping stdout
    /// free for the session's JSON output. Holds the stdin lock for the
    /// life of the channel; drop it before reading stdin anywhere else.
    pub fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stderr(),
        }
    }
}

impl<R: BufRead, W: Write> TerminalDisambiguator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt_menu(
        &mut self,
        context: &ChoiceContext<'_>,
        candidates: &[String],
    ) -> io::Result<()> {
        writeln!(
            self.output,
            "{}: {} move '{}' is banned; choose a replacement:",
            context.species_id,
            context.slot.as_str(),
            context.banned_move
        )?;
        for (index, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "  {}) {candidate}", index + 1)?;
        }
        write!(self.output, "selection [1-{}]: ", candidates.len())?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Disambiguator for TerminalDisambiguator<R, W> {
    fn choose(
        &mut self,
        context: &ChoiceContext<'_>,
        candidates: &[String],
    ) -> Result<usize, ResolveError> {
        loop {
            if self.prompt_menu(context, candidates).is_err() {
                return Err(ResolveError::Aborted);
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return Err(ResolveError::Aborted),
                Ok(_) => {}
            }

            match line.trim().parse::<usize>() {
                Ok(selection) if (1..=candidates.len()).contains(&selection) => {
                    return Ok(selection - 1);
                }
                _ => {
                    if writeln!(
                        self.output,
                        "invalid selection '{}'; enter a number between 1 and {}",
                        line.trim(),
                        candidates.len()
                    )
                    .is_err()
                    {
                        return Err(ResolveError::Aborted);
                    }
                }
            }
        }
    }
}

/// Replays a queue of prepared selections. An exhausted queue aborts, the
/// same way a closed terminal would.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDisambiguator {
    choices: VecDeque<usize>,
}

impl ScriptedDisambiguator {
    pub fn new(choices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.choices.is_empty()
    }
}

impl Disambiguator for ScriptedDisambiguator {
    fn choose(
        &mut self,
        _context: &ChoiceContext<'_>,
        _candidates: &[String],
    ) -> Result<usize, ResolveError> {
        self.choices.pop_front().ok_or(ResolveError::Aborted)
    }
}

/// Always takes the first candidate, in catalog order. Backs non-interactive
/// regeneration runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidateDisambiguator;

impl Disambiguator for FirstCandidateDisambiguator {
    fn choose(
        &mut self,
        _context: &ChoiceContext<'_>,
        _candidates: &[String],
    ) -> Result<usize, ResolveError> {
        Ok(0)
    }
}
