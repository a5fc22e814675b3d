//! Per-request research session state
//!
//! A session is created at the start of one run/stream call, mutated only by
//! the control flow handling that call, and discarded when the answer is
//! emitted or the call is cancelled. Nothing here is shared or persisted.

use crate::search::{Reference, SearchResult};
use serde::Serialize;

/// One planning → search iteration
#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub index: u32,
    pub queries: Vec<String>,
    pub results: Vec<SearchResult>,
}

/// Why a session stopped searching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The planner signalled the evidence is sufficient
    EvidenceSufficient,
    /// The round budget ran out
    RoundBudgetExhausted,
}

/// Mutable state of one end-to-end research request
#[derive(Debug, Serialize)]
pub struct Session {
    pub question: String,
    pub rounds: Vec<Round>,
    /// Accumulated references across all committed rounds
    pub references: Vec<Reference>,
    pub terminated: bool,
    pub termination: Option<TerminationReason>,
}

impl Session {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            rounds: Vec::new(),
            references: Vec::new(),
            terminated: false,
            termination: None,
        }
    }

    /// Commit a completed round: all of its results and references at once
    ///
    /// Callers must await the full batch first; a round is never visible
    /// half-committed to a later planning step.
    pub fn commit_round(&mut self, queries: Vec<String>, results: Vec<SearchResult>) {
        let new_references: Vec<Reference> = results
            .iter()
            .flat_map(|result| result.references.iter().flatten().cloned())
            .collect();

        self.references.extend(new_references);
        self.rounds.push(Round {
            index: self.rounds.len() as u32,
            queries,
            results,
        });
    }

    pub fn terminate(&mut self, reason: TerminationReason) {
        self.terminated = true;
        self.termination = Some(reason);
    }

    pub fn round_count(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Compact digest of prior rounds for the planning prompt
    pub fn round_digest(&self) -> String {
        let mut digest = String::new();
        for round in &self.rounds {
            digest.push_str(&format!(
                "Round {} queries: {}\n",
                round.index + 1,
                round.queries.join("; ")
            ));
            for result in &round.results {
                digest.push_str(&format!(
                    "- [{}] {}\n",
                    result.query,
                    truncate(&result.summary_content, 600)
                ));
            }
        }
        digest
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Reference;

    #[test]
    fn test_commit_round_accumulates_all_references() {
        let mut session = Session::new("question");
        let results = vec![
            SearchResult::new("q1", "s1").with_references(vec![
                Reference::new().with_url("a"),
                Reference::new().with_url("b"),
            ]),
            SearchResult::failure("q2", "boom"),
            SearchResult::new("q3", "s3")
                .with_references(vec![Reference::new().with_url("c")]),
        ];

        session.commit_round(vec!["q1".into(), "q2".into(), "q3".into()], results);

        assert_eq!(session.round_count(), 1);
        assert_eq!(session.reference_count(), 3);
        assert_eq!(session.rounds[0].index, 0);
        assert_eq!(session.rounds[0].results.len(), 3);
    }

    #[test]
    fn test_round_indices_are_sequential() {
        let mut session = Session::new("q");
        session.commit_round(vec!["a".into()], vec![SearchResult::new("a", "s")]);
        session.commit_round(vec!["b".into()], vec![SearchResult::new("b", "s")]);
        assert_eq!(session.rounds[0].index, 0);
        assert_eq!(session.rounds[1].index, 1);
    }

    #[test]
    fn test_round_digest_lists_queries_and_summaries() {
        let mut session = Session::new("q");
        session.commit_round(
            vec!["rust".into()],
            vec![SearchResult::new("rust", "a summary")],
        );
        let digest = session.round_digest();
        assert!(digest.contains("Round 1 queries: rust"));
        assert!(digest.contains("a summary"));
    }

    #[test]
    fn test_terminate_records_reason() {
        let mut session = Session::new("q");
        session.terminate(TerminationReason::EvidenceSufficient);
        assert!(session.terminated);
        assert_eq!(
            session.termination,
            Some(TerminationReason::EvidenceSufficient)
        );
    }
}
