//! Decision analysis types shared between the extraction pipeline and the review layer.
//!
//! Field names on the wire are camelCase and enumerated values are lowercase
//! string literals, matching the schema the extraction prompt asks for.

use serde::Serialize;

/// Lifecycle state of an extracted decision as stated in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Proposed,
    Confirmed,
    Unclear,
}

impl DecisionStatus {
    pub const ALL: [Self; 3] = [Self::Proposed, Self::Confirmed, Self::Unclear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Confirmed => "confirmed",
            Self::Unclear => "unclear",
        }
    }

    /// Parse the exact lowercase literal. Anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

/// Severity of a surfaced risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

impl RiskSeverity {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

/// Extraction confidence, always within `[0.0, 1.0]`.
///
/// The only ways to obtain one are [`Confidence::new`], which rejects
/// out-of-range and non-finite values, and [`Confidence::lowered`], which
/// clamps at zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 1.0;

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (Self::MIN..=Self::MAX).contains(&value)).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Subtract `penalty`, clamping at 0.0.
    pub fn lowered(self, penalty: f64) -> Self {
        Self((self.0 - penalty).max(Self::MIN))
    }

    pub fn band(self) -> ConfidenceBand {
        ConfidenceBand::of(self.0)
    }
}

/// Display banding for confidence values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub const HIGH_THRESHOLD: f64 = 0.8;
    pub const MEDIUM_THRESHOLD: f64 = 0.5;

    pub fn of(value: f64) -> Self {
        if value >= Self::HIGH_THRESHOLD {
            Self::High
        } else if value >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A decision extracted from a conversation, with the quotes that evidence it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub decision: String,
    pub status: DecisionStatus,
    /// Verbatim excerpts of the source transcript, in the order given.
    pub evidence_quotes: Vec<String>,
    /// Person responsible, or the literal `"unknown"`.
    pub owner: String,
    /// Timeline, or the literal `"unknown"`.
    pub deadline: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumption {
    pub assumption: String,
    pub risk_if_wrong: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub risk: String,
    pub severity: RiskSeverity,
    pub mitigation: String,
}

/// Structured record of one transcript: decisions, assumptions, risks, and
/// the single decision that must stay with a human.
///
/// `human_must_decide` and `why_human` are never empty, on the extracted path
/// (enforced by the validator) or the fallback path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAnalysis {
    pub decisions: Vec<Decision>,
    pub assumptions: Vec<Assumption>,
    pub risks: Vec<Risk>,
    pub open_questions: Vec<String>,
    pub human_must_decide: String,
    pub why_human: String,
    pub scale_concerns: Vec<String>,
}

impl DecisionAnalysis {
    /// Serialise to the same JSON shape the extraction endpoint is asked to return.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_literals_roundtrip() {
        for status in DecisionStatus::ALL {
            assert_eq!(DecisionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DecisionStatus::parse("Confirmed"), None);
        assert_eq!(DecisionStatus::parse("final"), None);
    }

    #[test]
    fn severity_literals_roundtrip() {
        for severity in RiskSeverity::ALL {
            assert_eq!(RiskSeverity::parse(severity.as_str()), Some(severity));
        }
        assert_eq!(RiskSeverity::parse("critical"), None);
    }

    #[test]
    fn confidence_bounds() {
        assert!(Confidence::new(0.0).is_some());
        assert!(Confidence::new(1.0).is_some());
        assert!(Confidence::new(0.5).is_some());
        assert!(Confidence::new(-0.01).is_none());
        assert!(Confidence::new(1.5).is_none());
        assert!(Confidence::new(f64::NAN).is_none());
        assert!(Confidence::new(f64::INFINITY).is_none());
    }

    #[test]
    fn lowered_clamps_at_zero() {
        let c = Confidence::new(0.1).unwrap();
        assert_eq!(c.lowered(0.2).value(), 0.0);
        let c = Confidence::new(0.9).unwrap();
        assert_eq!(c.lowered(0.2).value(), 0.9 - 0.2);
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(ConfidenceBand::of(0.9), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(0.8), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(0.6), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(0.3), ConfidenceBand::Low);
        assert_eq!(Confidence::new(0.5).unwrap().band(), ConfidenceBand::Medium);
    }

    #[test]
    fn serialises_camel_case_fields() {
        let analysis = DecisionAnalysis {
            decisions: vec![Decision {
                decision: "Ship BTC only".into(),
                status: DecisionStatus::Confirmed,
                evidence_quotes: vec!["Let's go with BTC only".into()],
                owner: "Sarah Chen".into(),
                deadline: "unknown".into(),
                confidence: Confidence::new(0.75).unwrap(),
            }],
            assumptions: vec![Assumption {
                assumption: "Rules stay stable".into(),
                risk_if_wrong: "Feature halted".into(),
            }],
            risks: vec![Risk {
                risk: "AML exposure".into(),
                severity: RiskSeverity::High,
                mitigation: "Enhanced monitoring".into(),
            }],
            open_questions: vec![],
            human_must_decide: "Launch approval".into(),
            why_human: "Regulatory accountability".into(),
            scale_concerns: vec![],
        };
        let json: serde_json::Value = serde_json::from_str(&analysis.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["decisions"][0]["evidenceQuotes"][0], "Let's go with BTC only");
        assert_eq!(json["decisions"][0]["status"], "confirmed");
        assert_eq!(json["decisions"][0]["confidence"], 0.75);
        assert_eq!(json["assumptions"][0]["riskIfWrong"], "Feature halted");
        assert_eq!(json["risks"][0]["severity"], "high");
        assert_eq!(json["humanMustDecide"], "Launch approval");
        assert!(json["scaleConcerns"].as_array().unwrap().is_empty());
    }
}
