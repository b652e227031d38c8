//! Prompt construction for schema-constrained decision extraction.
//!
//! Both prompts are pure functions of the transcript and the high-stakes
//! flag. The high-stakes block only asks the model to be conservative; the
//! confidence penalty itself is applied after validation.

// ── Prompt templates ──

const SYSTEM_PROMPT: &str = "\
You are a decision extraction assistant for a regulated organisation.

You read messy conversation threads (email, chat, meeting notes) and extract a structured \
record of the decisions, assumptions, risks, and open questions they contain. Be precise, \
conservative, and evidence-based.

Extraction rules:
1. Never invent a decision. If no explicit decision is present in the text, do not create one.
2. Keep stated facts separate from inference. Anything inferred belongs in assumptions, not decisions.
3. Every decision must carry at least one verbatim quote from the conversation in evidenceQuotes. \
Quote exactly; do not paraphrase.
4. Treat regulatory, compliance, legal, and client-impacting content conservatively and surface it as a risk.
5. Confidence must reflect actual uncertainty. Do not default to high confidence; an unclear or \
contested decision gets a low score.

Use \"unknown\" for any owner or deadline that is not stated.

For humanMustDecide, name the ONE most critical decision that must stay with a human, typically \
policy interpretation, regulatory compliance, client-impacting communication, financial risk \
acceptance, or a change of strategic direction. Explain why in whyHuman.";

const HIGH_STAKES_DIRECTIVE: &str = "

HIGH-STAKES MODE:
- Score confidence conservatively; reported scores will be lowered further after review.
- Flag additional risks, including second-order and regulatory ones.
- Do not make definitive statements about unclear decisions; mark them unclear.
- Prefer asking clarifying open questions over assuming.
- Be more conservative about whether any decision is final.";

const RESPONSE_SCHEMA: &str = r#"{
  "decisions": [
    {
      "decision": "specific decision text",
      "status": "proposed | confirmed | unclear",
      "evidenceQuotes": ["exact quote from the conversation"],
      "owner": "person name or unknown",
      "deadline": "timeline or unknown",
      "confidence": 0.0
    }
  ],
  "assumptions": [
    {
      "assumption": "assumption text",
      "riskIfWrong": "impact if the assumption is wrong"
    }
  ],
  "risks": [
    {
      "risk": "risk description",
      "severity": "low | medium | high",
      "mitigation": "suggested mitigation"
    }
  ],
  "openQuestions": ["unresolved question"],
  "humanMustDecide": "the one decision that requires human judgment",
  "whyHuman": "why that decision must stay with a human",
  "scaleConcerns": ["what would break first if this process scaled"]
}"#;

/// System and user instructions for one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub system: String,
    pub user: String,
}

pub fn build_prompts(transcript: &str, high_stakes: bool) -> Prompts {
    Prompts {
        system: build_system_prompt(high_stakes),
        user: build_user_prompt(transcript),
    }
}

pub fn build_system_prompt(high_stakes: bool) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    if high_stakes {
        prompt.push_str(HIGH_STAKES_DIRECTIVE);
    }
    prompt
}

/// Embed the transcript verbatim in the extraction directive.
pub fn build_user_prompt(transcript: &str) -> String {
    format!(
        "Analyze this conversation and extract decision information.\n\
         \n\
         <conversation>\n\
         {transcript}\n\
         </conversation>\n\
         \n\
         Return a JSON object that follows this schema exactly. Use these field names, \
         and for status and severity use only the lowercase values listed. confidence is a \
         number between 0.0 and 1.0.\n\
         \n\
         {RESPONSE_SCHEMA}\n\
         \n\
         Respond ONLY with syntactically valid JSON. No markdown fences, no explanation, \
         no text before or after the object."
    )
}
