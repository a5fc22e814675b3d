//! Planning and synthesis prompt construction, and plan-reply parsing
//!
//! The planning model is asked to reply with one JSON object:
//! `{"action": "search", "queries": [...]}` to request another round, or
//! `{"action": "answer"}` when the gathered evidence suffices. Reasoning
//! models tend to wrap the object in prose, so the parser extracts the
//! outermost `{...}` before deserializing. An unparseable reply or an empty
//! query list is taken as the sufficiency signal: synthesize with the
//! evidence at hand instead of looping on garbage.

use super::session::Session;
use crate::model::ChatMessage;
use serde::Deserialize;
use tracing::debug;

const PLANNING_SYSTEM_PROMPT: &str = r#"You are the planning step of a deep research agent. Given a research question and the evidence gathered so far, decide whether more web searches are needed.

Reply with exactly one JSON object and nothing else:
- {"action": "search", "queries": ["...", "..."]} — up to the stated maximum of new, non-redundant search queries that close the remaining evidence gaps.
- {"action": "answer"} — the evidence already suffices to answer the question.

Prefer specific queries over broad ones. Never repeat a query that was already issued."#;

const SYNTHESIS_SYSTEM_PROMPT: &str = r#"You are the synthesis step of a deep research agent. Using only the supplied references, write a thorough, well-structured answer to the research question.

- Synthesize across sources; do not summarize them one by one.
- Note disagreements between sources instead of hiding them.
- Cite sources inline with their URLs where a claim relies on them.
- If the references do not answer a part of the question, say so."#;

/// Outcome of one planning step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanDecision {
    /// Issue these queries as the next round
    Search(Vec<String>),
    /// Evidence is sufficient, move to synthesis
    Sufficient,
}

/// Build the planning conversation for the next round
pub fn build_planning_messages(session: &Session, max_search_words: usize) -> Vec<ChatMessage> {
    let mut context = format!(
        "Research question: {}\n\nMaximum queries for this round: {}\n",
        session.question, max_search_words
    );

    if session.rounds.is_empty() {
        context.push_str("\nNo searches have been issued yet.\n");
    } else {
        context.push_str(&format!(
            "\nEvidence gathered so far ({} references):\n{}",
            session.reference_count(),
            session.round_digest()
        ));
    }

    vec![
        ChatMessage::system(PLANNING_SYSTEM_PROMPT),
        ChatMessage::user(context),
    ]
}

/// Build the synthesis conversation from the full accumulated evidence
pub fn build_synthesis_messages(session: &Session) -> Vec<ChatMessage> {
    let mut evidence = String::new();
    for (i, reference) in session.references.iter().enumerate() {
        evidence.push_str(&format!(
            "[{}] {} — {}\n{}\n\n",
            i + 1,
            reference.title.as_deref().unwrap_or("(untitled)"),
            reference.url.as_deref().unwrap_or("(no url)"),
            reference.content.as_deref().unwrap_or(""),
        ));
    }
    if evidence.is_empty() {
        evidence.push_str("(no references were gathered)\n");
    }

    vec![
        ChatMessage::system(SYNTHESIS_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Research question: {}\n\nReferences:\n{}",
            session.question, evidence
        )),
    ]
}

/// Parse a planning reply into a decision, capping queries at `max_search_words`
pub fn parse_plan(raw: &str, max_search_words: usize) -> PlanDecision {
    let Some(object) = extract_json_object(raw) else {
        debug!("Planning reply carried no JSON object, treating as sufficient");
        return PlanDecision::Sufficient;
    };

    let Ok(reply) = serde_json::from_str::<PlanReply>(object) else {
        debug!("Planning reply failed to deserialize, treating as sufficient");
        return PlanDecision::Sufficient;
    };

    match reply.action.as_str() {
        "search" => {
            let queries: Vec<String> = reply
                .queries
                .into_iter()
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty())
                .take(max_search_words)
                .collect();
            if queries.is_empty() {
                PlanDecision::Sufficient
            } else {
                PlanDecision::Search(queries)
            }
        }
        _ => PlanDecision::Sufficient,
    }
}

#[derive(Debug, Deserialize)]
struct PlanReply {
    #[serde(default)]
    action: String,
    #[serde(default)]
    queries: Vec<String>,
}

/// Slice out the outermost `{...}` of a possibly chatty reply
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_decision() {
        let decision = parse_plan(r#"{"action":"search","queries":["a","b"]}"#, 5);
        assert_eq!(
            decision,
            PlanDecision::Search(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_parse_answer_decision() {
        assert_eq!(parse_plan(r#"{"action":"answer"}"#, 5), PlanDecision::Sufficient);
    }

    #[test]
    fn test_parse_extracts_object_from_prose() {
        let raw = "Thinking it over...\n{\"action\": \"search\", \"queries\": [\"x\"]}\nDone.";
        assert_eq!(
            parse_plan(raw, 5),
            PlanDecision::Search(vec!["x".to_string()])
        );
    }

    #[test]
    fn test_parse_caps_queries_at_limit() {
        let raw = r#"{"action":"search","queries":["a","b","c","d"]}"#;
        match parse_plan(raw, 2) {
            PlanDecision::Search(queries) => assert_eq!(queries, vec!["a", "b"]),
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_parse_drops_blank_queries() {
        let raw = r#"{"action":"search","queries":["  ", "real"]}"#;
        assert_eq!(
            parse_plan(raw, 5),
            PlanDecision::Search(vec!["real".to_string()])
        );
    }

    #[test]
    fn test_unparseable_reply_is_sufficient() {
        assert_eq!(parse_plan("no json here", 5), PlanDecision::Sufficient);
        assert_eq!(parse_plan("{broken", 5), PlanDecision::Sufficient);
        assert_eq!(
            parse_plan(r#"{"action":"search","queries":[]}"#, 5),
            PlanDecision::Sufficient
        );
    }

    #[test]
    fn test_planning_messages_carry_question_and_history() {
        let mut session = Session::new("why is the sky blue");
        let messages = build_planning_messages(&session, 3);
        assert_eq!(messages[0].role, "system");
        assert!(messages[1].content.contains("why is the sky blue"));
        assert!(messages[1].content.contains("No searches have been issued"));

        session.commit_round(
            vec!["rayleigh scattering".into()],
            vec![crate::search::SearchResult::new(
                "rayleigh scattering",
                "light scatters",
            )],
        );
        let messages = build_planning_messages(&session, 3);
        assert!(messages[1].content.contains("rayleigh scattering"));
    }

    #[test]
    fn test_synthesis_messages_number_references() {
        let mut session = Session::new("q");
        session.commit_round(
            vec!["a".into()],
            vec![crate::search::SearchResult::new("a", "s").with_references(vec![
                crate::search::Reference::new()
                    .with_title("T1")
                    .with_url("https://one.example"),
                crate::search::Reference::new().with_title("T2"),
            ])],
        );
        let messages = build_synthesis_messages(&session);
        assert!(messages[1].content.contains("[1] T1 — https://one.example"));
        assert!(messages[1].content.contains("[2] T2"));
    }
}
