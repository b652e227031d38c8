//! Transcript helpers: email header extraction and evidence quote checks.
//!
//! Quotes are compared after collapsing runs of whitespace to a single space,
//! so a quote that was reflowed across lines in the transcript still matches.

use crate::model::DecisionAnalysis;

/// Header values from the first `From:`, `To:`, and `Subject:` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailMetadata {
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject: Option<String>,
}

impl EmailMetadata {
    /// Scan a transcript for email-style headers.
    ///
    /// `From:` stops before any `<address>` part, so
    /// `From: Sarah Chen <s.chen@example.com>` yields `Sarah Chen`.
    pub fn parse(transcript: &str) -> Self {
        let mut meta = Self::default();
        for line in transcript.lines() {
            let line = line.trim_start();
            if meta.from.is_none()
                && let Some(rest) = line.strip_prefix("From:")
            {
                let name = rest.split('<').next().unwrap_or_default();
                meta.from = non_empty(name);
            } else if meta.to.is_none()
                && let Some(rest) = line.strip_prefix("To:")
            {
                meta.to = non_empty(rest);
            } else if meta.subject.is_none()
                && let Some(rest) = line.strip_prefix("Subject:")
            {
                meta.subject = non_empty(rest);
            }
        }
        meta
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.subject.is_none()
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Evidence quotes that do not occur in the transcript, as
/// `(decision index, quote)` pairs in decision order.
pub fn unverified_quotes(analysis: &DecisionAnalysis, transcript: &str) -> Vec<(usize, String)> {
    let haystack = normalize_whitespace(transcript);
    analysis
        .decisions
        .iter()
        .enumerate()
        .flat_map(|(i, d)| d.evidence_quotes.iter().map(move |q| (i, q)))
        .filter(|(_, q)| {
            let needle = normalize_whitespace(q);
            needle.is_empty() || !haystack.contains(&needle)
        })
        .map(|(i, q)| (i, q.clone()))
        .collect()
}
