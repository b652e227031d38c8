//! Vertical summary card for a decision analysis.
//!
//! Groups the analysis into sections with aligned labels. Empty sections are
//! skipped, except the human boundary which is always shown.

use std::io::{self, Write};

use boundary_core::{ConfidenceBand, Decision, DecisionAnalysis, EmailMetadata, Readiness};

const MAX_LIST_ITEMS: usize = 10;

// ── Public API ──

/// Write the summary card for one analysis.
pub fn write_summary(
    out: &mut impl Write,
    analysis: &DecisionAnalysis,
    meta: &EmailMetadata,
    high_stakes: bool,
) -> io::Result<()> {
    let title = meta.subject.as_deref().unwrap_or("Conversation analysis");
    writeln!(out, "=== {title} ===")?;
    if let Some(from) = &meta.from {
        writeln!(out, "From {from}")?;
    }
    if let Some(to) = &meta.to {
        writeln!(out, "To {to}")?;
    }
    writeln!(out)?;

    writeln!(out, "Overview")?;
    field(out, "mode", if high_stakes { "high-stakes" } else { "standard" })?;
    field(out, "decisions", &analysis.decisions.len().to_string())?;
    field(out, "risks", &analysis.risks.len().to_string())?;
    field(out, "assumptions", &analysis.assumptions.len().to_string())?;
    field(out, "open questions", &analysis.open_questions.len().to_string())?;
    writeln!(out)?;

    if !analysis.decisions.is_empty() {
        writeln!(out, "Decisions")?;
        for (i, d) in analysis.decisions.iter().enumerate() {
            write_decision(out, i, d)?;
        }
    }

    if !analysis.risks.is_empty() {
        writeln!(out, "Risks")?;
        for r in analysis.risks.iter().take(MAX_LIST_ITEMS) {
            writeln!(out, "  [{}] {}", r.severity.as_str().to_uppercase(), r.risk)?;
            if !r.mitigation.is_empty() {
                writeln!(out, "        mitigation: {}", r.mitigation)?;
            }
        }
        more(out, analysis.risks.len())?;
        writeln!(out)?;
    }

    if !analysis.assumptions.is_empty() {
        writeln!(out, "Assumptions")?;
        for a in analysis.assumptions.iter().take(MAX_LIST_ITEMS) {
            writeln!(out, "  - {}", a.assumption)?;
            if !a.risk_if_wrong.is_empty() {
                writeln!(out, "    if wrong: {}", a.risk_if_wrong)?;
            }
        }
        more(out, analysis.assumptions.len())?;
        writeln!(out)?;
    }

    list_section(out, "Open Questions", &analysis.open_questions)?;
    list_section(out, "Scale Concerns", &analysis.scale_concerns)?;

    writeln!(out, "Human Boundary")?;
    field(out, "must decide", &analysis.human_must_decide)?;
    field(out, "why", &analysis.why_human)?;
    writeln!(out)?;

    Ok(())
}

/// Write what still blocks export, plus any low-confidence advisories.
pub fn write_readiness(out: &mut impl Write, readiness: &Readiness) -> io::Result<()> {
    for advisory in &readiness.advisories {
        writeln!(out, "  ! {}", advisory.message)?;
    }
    if readiness.is_ready() {
        writeln!(out, "Ready for export.")?;
        return Ok(());
    }
    if !readiness.missing.is_empty() {
        let numbers: Vec<String> = readiness
            .missing
            .iter()
            .map(|i| (i + 1).to_string())
            .collect();
        writeln!(out, "Awaiting approval: decision {}", numbers.join(", "))?;
    }
    if !readiness.accountability_confirmed {
        writeln!(out, "Accountability not confirmed.")?;
    }
    Ok(())
}

/// `85% (high)` style confidence label.
pub fn format_confidence(value: f64) -> String {
    format!(
        "{:.0}% ({})",
        value * 100.0,
        ConfidenceBand::of(value).as_str()
    )
}

// ── Section rendering ──

fn write_decision(out: &mut impl Write, index: usize, d: &Decision) -> io::Result<()> {
    writeln!(out, "  {}. {}", index + 1, d.decision)?;
    field(out, "  status", d.status.as_str())?;
    field(out, "  owner", &d.owner)?;
    field(out, "  deadline", &d.deadline)?;
    field(out, "  confidence", &format_confidence(d.confidence.value()))?;
    for quote in &d.evidence_quotes {
        writeln!(out, "       \"{quote}\"")?;
    }
    writeln!(out)
}

fn list_section(out: &mut impl Write, header: &str, items: &[String]) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "{header}")?;
    for item in items.iter().take(MAX_LIST_ITEMS) {
        writeln!(out, "  - {item}")?;
    }
    more(out, items.len())?;
    writeln!(out)
}

fn field(out: &mut impl Write, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "  {label:<16} {value}")
}

fn more(out: &mut impl Write, total: usize) -> io::Result<()> {
    if total > MAX_LIST_ITEMS {
        writeln!(out, "  ... and {} more", total - MAX_LIST_ITEMS)?;
    }
    Ok(())
}
