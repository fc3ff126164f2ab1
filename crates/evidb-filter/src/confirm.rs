//! Confirmation gate implementations.
//!
//! `PromptConfirm` and `TerminalConfirm` block on a y/n answer; the other two
//! answer without asking, for batch and test use.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use evidb_core::config::ConfirmPolicy;
use evidb_core::traits::ConfirmFilters;
use evidb_core::types::FilterSet;

pub struct AlwaysApply;

impl ConfirmFilters for AlwaysApply {
    fn confirm(&self, _filters: &FilterSet) -> anyhow::Result<bool> { Ok(true) }
}

pub struct NeverApply;

impl ConfirmFilters for NeverApply {
    fn confirm(&self, _filters: &FilterSet) -> anyhow::Result<bool> { Ok(false) }
}

/// Prompt over an arbitrary reader/writer pair.
pub struct PromptConfirm<R, W> {
    io: Mutex<(R, W)>,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self { Self { io: Mutex::new((input, output)) } }

    pub fn into_inner(self) -> (R, W) {
        match self.io.into_inner() {
            Ok(io) => io,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> ConfirmFilters for PromptConfirm<R, W> {
    fn confirm(&self, filters: &FilterSet) -> anyhow::Result<bool> {
        let mut guard = self.io.lock().map_err(|_| anyhow::anyhow!("confirmation prompt lock poisoned"))?;
        let (input, output) = &mut *guard;
        prompt(input, output, filters)
    }
}

/// Prompt on the process terminal. Locks stdin per question so line input
/// stays shared with any other stdin reader in the process.
pub struct TerminalConfirm;

impl ConfirmFilters for TerminalConfirm {
    fn confirm(&self, filters: &FilterSet) -> anyhow::Result<bool> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        prompt(&mut stdin.lock(), &mut stdout.lock(), filters)
    }
}

/// Ask until the answer is `y` or `n` (any case). End of input counts as `n`.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, filters: &FilterSet) -> anyhow::Result<bool> {
    writeln!(output, "\t** inferred filters: {filters} **")?;
    loop {
        write!(output, "apply filters? [y/n]: ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => writeln!(output, "please answer 'y' or 'n'")?,
        }
    }
}

pub fn confirmer_for(policy: ConfirmPolicy) -> Box<dyn ConfirmFilters> {
    match policy {
        ConfirmPolicy::Prompt => Box::new(TerminalConfirm),
        ConfirmPolicy::Always => Box::new(AlwaysApply),
        ConfirmPolicy::Never => Box::new(NeverApply),
    }
}
