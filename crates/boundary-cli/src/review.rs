//! Interactive approval walk and decision log export.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use boundary_core::ReviewSession;
use chrono::{DateTime, Local};

use crate::display::{format_confidence, write_readiness};

/// Line-oriented question/answer over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for a line of text. End of input reads as an empty answer.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Yes/no question defaulting to no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N] "))?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}

/// Walk every decision, collect verdicts, then ask for the accountability
/// confirmation. Declined decisions stay Pending.
pub fn run_review<R: BufRead, W: Write>(
    session: &mut ReviewSession,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let total = session.analysis().decisions.len();
    let out = prompter.output();
    if total == 0 {
        writeln!(out, "No decisions to approve.")?;
    } else {
        writeln!(out, "Reviewing {total} decision(s).")?;
    }

    for index in 0..total {
        let decision = session.analysis().decisions[index].clone();
        let out = prompter.output();
        writeln!(out)?;
        writeln!(out, "Decision {}/{total}: {}", index + 1, decision.decision)?;
        writeln!(
            out,
            "  owner {} | deadline {} | confidence {}",
            decision.owner,
            decision.deadline,
            format_confidence(decision.confidence.value())
        )?;

        if !prompter.confirm("Approve this decision?")? {
            session.record_approval(index, false, "", "")?;
            continue;
        }
        let edited = prompter.ask("Edited wording (blank to keep): ")?;
        let attestation = prompter.ask("Attestation: ")?;
        session.record_approval(index, true, edited, attestation)?;
    }

    writeln!(prompter.output())?;
    if prompter.confirm("I confirm I am accountable for the approved decisions.")? {
        session.confirm_accountability();
    }

    write_readiness(prompter.output(), &session.readiness())?;
    Ok(())
}

/// Render the session's log and write it to `path`.
///
/// Nothing is written when the approval gate is not satisfied.
pub fn export_log(session: &ReviewSession, path: &Path) -> anyhow::Result<()> {
    let log = session.render_log()?;
    std::fs::write(path, log).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "decision log exported");
    Ok(())
}

/// `decision_log_<YYYYmmdd_HHMMSS>.md` in the working directory.
pub fn default_output_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("decision_log_{}.md", now.format("%Y%m%d_%H%M%S")))
}
