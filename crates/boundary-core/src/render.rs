//! Markdown decision log for an approved analysis.
//!
//! Section order is fixed: decisions, risks, assumptions, open questions,
//! then the human boundary. Optional sections are omitted when empty. The
//! `Generated:` line is the only content that varies between renders of the
//! same analysis and approvals.

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::PreconditionError;
use crate::gate::ApprovalGate;
use crate::model::{Decision, DecisionAnalysis};

/// Prefix of the single timestamp line in a rendered log.
pub const GENERATED_PREFIX: &str = "Generated: ";

const EVIDENCE_DELIMITER: &str = "; ";

/// Render the decision log, stamped with the current time.
pub fn render_log(
    analysis: &DecisionAnalysis,
    gate: &ApprovalGate,
) -> Result<String, PreconditionError> {
    render_log_at(analysis, gate, Utc::now())
}

/// Render the decision log with an explicit `Generated:` timestamp.
pub fn render_log_at(
    analysis: &DecisionAnalysis,
    gate: &ApprovalGate,
    generated_at: DateTime<Utc>,
) -> Result<String, PreconditionError> {
    gate.check_ready(analysis)?;

    let mut out = String::new();
    out.push_str("# DECISION LOG\n");
    out.push_str(GENERATED_PREFIX);
    out.push_str(&generated_at.to_rfc3339_opts(SecondsFormat::Secs, true));
    out.push_str("\n\n");

    push_decisions(&mut out, analysis, gate);
    push_risks(&mut out, analysis);
    push_assumptions(&mut out, analysis);
    push_open_questions(&mut out, analysis);
    push_human_boundary(&mut out, analysis, gate);

    Ok(out)
}

// ── Sections ──

fn push_decisions(out: &mut String, analysis: &DecisionAnalysis, gate: &ApprovalGate) {
    out.push_str("## DECISIONS\n");
    if analysis.decisions.is_empty() {
        out.push_str("_No decisions extracted._\n\n");
        return;
    }
    for (i, decision) in analysis.decisions.iter().enumerate() {
        push_decision(out, i, decision, gate);
    }
}

fn push_decision(out: &mut String, index: usize, decision: &Decision, gate: &ApprovalGate) {
    let _ = writeln!(
        out,
        "**Decision {}:** {}",
        index + 1,
        one_line(&decision.decision)
    );
    let _ = writeln!(out, "- Status: {}", decision.status.as_str());
    let _ = writeln!(out, "- Owner: {}", one_line(&decision.owner));
    let _ = writeln!(out, "- Deadline: {}", one_line(&decision.deadline));
    let _ = writeln!(out, "- Human Approval: {}", gate.state(index).as_str());

    if let Some(record) = gate.record(index) {
        let edited = one_line(&record.edited_decision);
        if !edited.is_empty() && edited != one_line(&decision.decision) {
            let _ = writeln!(out, "- Human Edit: {edited}");
        }
        let confirmation = one_line(&record.human_confirmation);
        if !confirmation.is_empty() {
            let _ = writeln!(out, "- Confirmation: {confirmation}");
        }
    }

    let quotes: Vec<String> = decision.evidence_quotes.iter().map(|q| one_line(q)).collect();
    let _ = writeln!(out, "- Evidence: {}", quotes.join(EVIDENCE_DELIMITER));
    out.push('\n');
}

fn push_risks(out: &mut String, analysis: &DecisionAnalysis) {
    if analysis.risks.is_empty() {
        return;
    }
    out.push_str("## RISKS IDENTIFIED\n");
    for risk in &analysis.risks {
        let _ = writeln!(
            out,
            "- **{}**: {}",
            risk.severity.as_str().to_ascii_uppercase(),
            one_line(&risk.risk)
        );
        let _ = writeln!(out, "  - Mitigation: {}", one_line(&risk.mitigation));
    }
    out.push('\n');
}

fn push_assumptions(out: &mut String, analysis: &DecisionAnalysis) {
    if analysis.assumptions.is_empty() {
        return;
    }
    out.push_str("## KEY ASSUMPTIONS\n");
    for assumption in &analysis.assumptions {
        let _ = writeln!(out, "- {}", one_line(&assumption.assumption));
        let _ = writeln!(
            out,
            "  - Risk if wrong: {}",
            one_line(&assumption.risk_if_wrong)
        );
    }
    out.push('\n');
}

fn push_open_questions(out: &mut String, analysis: &DecisionAnalysis) {
    if analysis.open_questions.is_empty() {
        return;
    }
    out.push_str("## OPEN QUESTIONS\n");
    for question in &analysis.open_questions {
        let _ = writeln!(out, "- {}", one_line(question));
    }
    out.push('\n');
}

fn push_human_boundary(out: &mut String, analysis: &DecisionAnalysis, gate: &ApprovalGate) {
    out.push_str("## HUMAN BOUNDARY\n");
    let _ = writeln!(
        out,
        "**Critical Decision Requiring Human Judgment:** {}",
        one_line(&analysis.human_must_decide)
    );
    let _ = writeln!(out, "**Rationale:** {}", one_line(&analysis.why_human));
    if gate.accountability_confirmed() {
        out.push_str("**Accountability:** Confirmed by reviewer\n");
    }
}

/// Join the lines of a field with single spaces so every rendered field stays
/// on one line of the log.
fn one_line(s: &str) -> String {
    s.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
