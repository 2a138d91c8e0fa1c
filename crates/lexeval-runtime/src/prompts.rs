//! Prompts sent to the scoring provider.
//!
//! The system prompt is shared across analysis types and fixes the reply
//! format; the per-type instruction and the text itself vary per request.

use lexeval_core::AnalysisType;

use crate::providers::{ChatMessage, ProviderRequest};

/// System prompt shared by every scoring request.
pub const BASE_SYSTEM_PROMPT: &str = r#"
You are a quality evaluator for short texts written by an assistant for end users.

Score the text you are given. Do not rewrite it and do not answer it.

## Output Format (JSON only, no prose around it)
{
  "scores": {
    "<category>": 0-100
  },
  "confidence": 0-100,
  "justification": "one or two sentences"
}

## Rules
1. Use between three and five categories relevant to the analysis type
2. Every score is a number from 0 to 100
3. Confidence reflects how sure you are of the scores, not how good the text is
4. Texts are usually in Spanish; judge them in their own language
"#;

/// Instruction for one analysis type.
pub fn instruction_for(analysis_type: AnalysisType) -> &'static str {
    match analysis_type {
        AnalysisType::Analyze => {
            "Analysis type: analyze. Score the text as a general analysis of the user's situation. \
             Suggested categories: clarity, relevance, depth, accuracy."
        }
        AnalysisType::Advice => {
            "Analysis type: advice. Score the text as practical advice. \
             Suggested categories: actionability, clarity, relevance, tone."
        }
        AnalysisType::Patterns => {
            "Analysis type: patterns. Score the text as a description of behavioral patterns. \
             Suggested categories: insight, evidence, clarity, usefulness."
        }
        AnalysisType::Schedule => {
            "Analysis type: schedule. Score the text as a proposed daily schedule. \
             Suggested categories: feasibility, balance, clarity, justification."
        }
        AnalysisType::Evaluate => {
            "Analysis type: evaluate. Score the overall quality of the text. \
             Suggested categories: coherence, clarity, completeness, tone."
        }
    }
}

/// Build the chat messages for one scoring request.
pub fn build_messages(request: &ProviderRequest) -> Vec<ChatMessage> {
    let mut user = String::from(instruction_for(request.analysis_type));

    if let Some(context) = &request.context {
        let rendered =
            serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string());
        user.push_str("\n\n## Context\n");
        user.push_str(&rendered);
    }

    user.push_str("\n\n## Text to evaluate\n");
    user.push_str(&request.text);

    vec![
        ChatMessage::system(BASE_SYSTEM_PROMPT.trim()),
        ChatMessage::user(user),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_an_instruction() {
        for kind in AnalysisType::ALL {
            assert!(instruction_for(kind).contains(kind.as_str()));
        }
    }

    #[test]
    fn test_messages_include_text_and_context() {
        let request = ProviderRequest {
            text: "Duerme ocho horas.".to_string(),
            analysis_type: AnalysisType::Advice,
            context: Some(serde_json::json!({"goal": "descansar"})),
        };

        let messages = build_messages(&request);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("\"scores\""));
        assert!(messages[1].content.contains("Duerme ocho horas."));
        assert!(messages[1].content.contains("descansar"));
        assert!(messages[1].content.contains("advice"));
    }

    #[test]
    fn test_context_section_omitted_when_absent() {
        let request = ProviderRequest {
            text: "Hola".to_string(),
            analysis_type: AnalysisType::Evaluate,
            context: None,
        };
        assert!(!build_messages(&request)[1].content.contains("## Context"));
    }
}
