//! Strict decode-and-validate for extraction responses.
//!
//! The raw text is parsed as JSON and walked field by field in schema order.
//! The first missing field, type mismatch, out-of-set enum literal, or
//! out-of-range confidence aborts with a [`ValidationError`] naming that
//! field's path. Nothing is built from a response that fails anywhere.
//!
//! Unknown extra fields are ignored.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::model::{
    Assumption, Confidence, Decision, DecisionAnalysis, DecisionStatus, Risk, RiskSeverity,
};

const STATUS_VALUES: &[&str] = &["proposed", "confirmed", "unclear"];
const SEVERITY_VALUES: &[&str] = &["low", "medium", "high"];

/// A [`DecisionAnalysis`] that came out of [`validate_response`].
///
/// Only the validator can construct one, and the confidence adjuster consumes
/// it, so an analysis is adjusted at most once and fallback analyses are
/// never adjusted.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAnalysis(DecisionAnalysis);

impl ValidatedAnalysis {
    pub fn as_analysis(&self) -> &DecisionAnalysis {
        &self.0
    }

    /// Take the analysis without any confidence adjustment.
    pub fn into_inner(self) -> DecisionAnalysis {
        self.0
    }
}

/// Parse and type-check a raw extraction response.
pub fn validate_response(raw: &str) -> Result<ValidatedAnalysis, ValidationError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ValidationError::new("$", ValidationErrorKind::Malformed(e.to_string())))?;
    debug!(bytes = raw.len(), "extraction response parsed as JSON");

    let root = value
        .as_object()
        .ok_or_else(|| wrong_type("$", "object"))?;

    let decisions = array_of(root, "decisions", "decisions", decision)?;
    let assumptions = array_of(root, "assumptions", "assumptions", assumption)?;
    let risks = array_of(root, "risks", "risks", risk)?;
    let open_questions = string_array(root, "openQuestions", "openQuestions")?;
    let human_must_decide = non_blank(root, "humanMustDecide", "humanMustDecide")?;
    let why_human = non_blank(root, "whyHuman", "whyHuman")?;
    let scale_concerns = string_array(root, "scaleConcerns", "scaleConcerns")?;

    Ok(ValidatedAnalysis(DecisionAnalysis {
        decisions,
        assumptions,
        risks,
        open_questions,
        human_must_decide,
        why_human,
        scale_concerns,
    }))
}

// ── Record decoders ──

fn decision(obj: &Map<String, Value>, path: &str) -> Result<Decision, ValidationError> {
    let text = string(obj, "decision", &field_path(path, "decision"))?;

    let status_path = field_path(path, "status");
    let status_raw = string(obj, "status", &status_path)?;
    let status = DecisionStatus::parse(&status_raw)
        .ok_or_else(|| not_in_set(&status_path, status_raw, STATUS_VALUES))?;

    let evidence_quotes = string_array(obj, "evidenceQuotes", &field_path(path, "evidenceQuotes"))?;
    let owner = string(obj, "owner", &field_path(path, "owner"))?;
    let deadline = string(obj, "deadline", &field_path(path, "deadline"))?;

    let confidence_path = field_path(path, "confidence");
    let raw_confidence = required(obj, "confidence", &confidence_path)?
        .as_f64()
        .ok_or_else(|| wrong_type(&confidence_path, "number"))?;
    let confidence = Confidence::new(raw_confidence).ok_or_else(|| {
        ValidationError::new(
            confidence_path,
            ValidationErrorKind::OutOfRange {
                value: raw_confidence,
            },
        )
    })?;

    Ok(Decision {
        decision: text,
        status,
        evidence_quotes,
        owner,
        deadline,
        confidence,
    })
}

fn assumption(obj: &Map<String, Value>, path: &str) -> Result<Assumption, ValidationError> {
    Ok(Assumption {
        assumption: string(obj, "assumption", &field_path(path, "assumption"))?,
        risk_if_wrong: string(obj, "riskIfWrong", &field_path(path, "riskIfWrong"))?,
    })
}

fn risk(obj: &Map<String, Value>, path: &str) -> Result<Risk, ValidationError> {
    let text = string(obj, "risk", &field_path(path, "risk"))?;

    let severity_path = field_path(path, "severity");
    let severity_raw = string(obj, "severity", &severity_path)?;
    let severity = RiskSeverity::parse(&severity_raw)
        .ok_or_else(|| not_in_set(&severity_path, severity_raw, SEVERITY_VALUES))?;

    let mitigation = string(obj, "mitigation", &field_path(path, "mitigation"))?;

    Ok(Risk {
        risk: text,
        severity,
        mitigation,
    })
}

// ── Field helpers ──

fn required<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ValidationError::new(path, ValidationErrorKind::Missing)),
        Some(v) => Ok(v),
    }
}

fn string(obj: &Map<String, Value>, key: &str, path: &str) -> Result<String, ValidationError> {
    required(obj, key, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(path, "string"))
}

fn non_blank(obj: &Map<String, Value>, key: &str, path: &str) -> Result<String, ValidationError> {
    let s = string(obj, key, path)?;
    if s.trim().is_empty() {
        return Err(ValidationError::new(path, ValidationErrorKind::Blank));
    }
    Ok(s)
}

fn string_array(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Vec<String>, ValidationError> {
    let items = required(obj, key, path)?
        .as_array()
        .ok_or_else(|| wrong_type(path, "array of strings"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| wrong_type(&index_path(path, i), "string"))
        })
        .collect()
}

fn array_of<T>(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    decode: fn(&Map<String, Value>, &str) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ValidationError> {
    let items = required(obj, key, path)?
        .as_array()
        .ok_or_else(|| wrong_type(path, "array of objects"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item_path = index_path(path, i);
            let record = item
                .as_object()
                .ok_or_else(|| wrong_type(&item_path, "object"))?;
            decode(record, &item_path)
        })
        .collect()
}

fn field_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

fn index_path(parent: &str, i: usize) -> String {
    format!("{parent}[{i}]")
}

fn wrong_type(path: &str, expected: &'static str) -> ValidationError {
    ValidationError::new(path, ValidationErrorKind::WrongType { expected })
}

fn not_in_set(path: &str, value: String, allowed: &'static [&'static str]) -> ValidationError {
    ValidationError::new(path, ValidationErrorKind::NotInSet { value, allowed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_response() -> Value {
        json!({
            "decisions": [
                {
                    "decision": "Launch with BTC only and $5K daily limits",
                    "status": "confirmed",
                    "evidenceQuotes": ["Let's go with BTC only, $5K daily limits"],
                    "owner": "Sarah Chen",
                    "deadline": "Friday",
                    "confidence": 0.85
                },
                {
                    "decision": "Seek legal sign-off",
                    "status": "unclear",
                    "evidenceQuotes": [],
                    "owner": "unknown",
                    "deadline": "unknown",
                    "confidence": 0.4
                }
            ],
            "assumptions": [
                {"assumption": "Regulation stays stable", "riskIfWrong": "Feature halted"}
            ],
            "risks": [
                {"risk": "FINTRAC reporting unclear", "severity": "high", "mitigation": "Legal review"}
            ],
            "openQuestions": ["What are the reporting thresholds?"],
            "humanMustDecide": "Final launch approval",
            "whyHuman": "Regulatory accountability",
            "scaleConcerns": ["Manual compliance review"]
        })
    }

    fn validate_value(v: &Value) -> Result<ValidatedAnalysis, ValidationError> {
        validate_response(&v.to_string())
    }

    #[test]
    fn accepts_valid_response() {
        let analysis = validate_value(&valid_response()).unwrap().into_inner();
        assert_eq!(analysis.decisions.len(), 2);
        let first = &analysis.decisions[0];
        assert_eq!(first.status, DecisionStatus::Confirmed);
        assert_eq!(first.owner, "Sarah Chen");
        assert_eq!(first.confidence.value(), 0.85);
        assert_eq!(analysis.risks[0].severity, RiskSeverity::High);
        assert_eq!(analysis.assumptions[0].risk_if_wrong, "Feature halted");
        assert_eq!(analysis.human_must_decide, "Final launch approval");
    }

    #[test]
    fn roundtrips_without_field_loss() {
        let first = validate_value(&valid_response()).unwrap().into_inner();
        let second = validate_response(&first.to_json_pretty().unwrap())
            .unwrap()
            .into_inner();
        assert_eq!(first, second);
    }

    #[test]
    fn accepts_empty_collections() {
        let v = json!({
            "decisions": [],
            "assumptions": [],
            "risks": [],
            "openQuestions": [],
            "humanMustDecide": "Whether any decision was made",
            "whyHuman": "Nothing explicit in the thread",
            "scaleConcerns": []
        });
        let analysis = validate_value(&v).unwrap().into_inner();
        assert!(analysis.decisions.is_empty());
    }

    #[test]
    fn integer_confidence_is_a_number() {
        let mut v = valid_response();
        v["decisions"][0]["confidence"] = json!(1);
        let analysis = validate_value(&v).unwrap().into_inner();
        assert_eq!(analysis.decisions[0].confidence.value(), 1.0);
    }

    #[test]
    fn ignores_unknown_fields() {
        let mut v = valid_response();
        v["model_notes"] = json!("extra");
        v["decisions"][0]["rationale"] = json!("extra");
        assert!(validate_value(&v).is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = validate_response("{\"decisions\": [").unwrap_err();
        assert_eq!(err.field, "$");
        assert!(matches!(err.kind, ValidationErrorKind::Malformed(_)));
    }

    #[test]
    fn rejects_prose_wrapped_json() {
        let raw = format!("Here is the analysis:\n{}", valid_response());
        let err = validate_response(&raw).unwrap_err();
        assert!(matches!(err.kind, ValidationErrorKind::Malformed(_)));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = validate_response("[1, 2, 3]").unwrap_err();
        assert_eq!(err.field, "$");
        assert_eq!(err.kind, ValidationErrorKind::WrongType { expected: "object" });
    }

    #[test]
    fn names_first_missing_top_level_field() {
        let mut v = valid_response();
        v.as_object_mut().unwrap().remove("whyHuman");
        v.as_object_mut().unwrap().remove("scaleConcerns");
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "whyHuman");
        assert_eq!(err.kind, ValidationErrorKind::Missing);
    }

    #[test]
    fn names_missing_nested_field() {
        let mut v = valid_response();
        v["decisions"][1].as_object_mut().unwrap().remove("owner");
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "decisions[1].owner");
        assert_eq!(err.kind, ValidationErrorKind::Missing);
    }

    #[test]
    fn null_counts_as_missing() {
        let mut v = valid_response();
        v["decisions"][0]["deadline"] = Value::Null;
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "decisions[0].deadline");
        assert_eq!(err.kind, ValidationErrorKind::Missing);
    }

    #[test]
    fn rejects_wrong_types() {
        let mut v = valid_response();
        v["decisions"][0]["confidence"] = json!("0.85");
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "decisions[0].confidence");
        assert_eq!(err.kind, ValidationErrorKind::WrongType { expected: "number" });

        let mut v = valid_response();
        v["decisions"][0]["evidenceQuotes"] = json!(["ok", 3]);
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "decisions[0].evidenceQuotes[1]");

        let mut v = valid_response();
        v["risks"] = json!({"risk": "not a list"});
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "risks");

        let mut v = valid_response();
        v["assumptions"] = json!(["just a string"]);
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "assumptions[0]");
        assert_eq!(err.kind, ValidationErrorKind::WrongType { expected: "object" });
    }

    #[test]
    fn rejects_out_of_set_status() {
        let mut v = valid_response();
        v["decisions"][1]["status"] = json!("final");
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "decisions[1].status");
        assert_eq!(
            err.kind,
            ValidationErrorKind::NotInSet {
                value: "final".into(),
                allowed: STATUS_VALUES,
            }
        );
    }

    #[test]
    fn enum_literals_are_case_sensitive() {
        let mut v = valid_response();
        v["risks"][0]["severity"] = json!("HIGH");
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "risks[0].severity");
        assert!(matches!(err.kind, ValidationErrorKind::NotInSet { .. }));
    }

    #[test]
    fn rejects_confidence_out_of_range() {
        for bad in [1.5, -0.1, 100.0] {
            let mut v = valid_response();
            v["decisions"][0]["confidence"] = json!(bad);
            let err = validate_value(&v).unwrap_err();
            assert_eq!(err.field, "decisions[0].confidence");
            assert_eq!(err.kind, ValidationErrorKind::OutOfRange { value: bad });
        }
    }

    #[test]
    fn rejects_blank_human_boundary() {
        let mut v = valid_response();
        v["humanMustDecide"] = json!("   ");
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "humanMustDecide");
        assert_eq!(err.kind, ValidationErrorKind::Blank);
    }

    #[test]
    fn snake_case_fields_are_not_accepted() {
        let mut v = valid_response();
        let obj = v.as_object_mut().unwrap();
        let q = obj.remove("openQuestions").unwrap();
        obj.insert("open_questions".into(), q);
        let err = validate_value(&v).unwrap_err();
        assert_eq!(err.field, "openQuestions");
    }
}
