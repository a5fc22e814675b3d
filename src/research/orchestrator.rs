//! The deep research loop
//!
//! Drives the planning → searching → evaluating → synthesizing state machine
//! for one session. Planning and synthesis go through the abstract
//! [`ChatModel`]; searching goes through the [`SearchExecutor`] façade. Model
//! failures are fatal to the session, search failures never are.

use super::events::ResearchEvent;
use super::planner::{build_planning_messages, build_synthesis_messages, parse_plan, PlanDecision};
use super::session::{Session, TerminationReason};
use crate::engines::SearchEngine;
use crate::error::DeepSearchError;
use crate::model::ChatModel;
use crate::search::SearchExecutor;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

type EventSender = mpsc::Sender<Result<ResearchEvent, DeepSearchError>>;

/// Limits and model identifiers for one research session
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    pub planning_model: String,
    pub synthesis_model: String,
    /// Maximum queries per planning round
    pub max_search_words: usize,
    /// Maximum planning rounds per session
    pub max_planning_rounds: u32,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            planning_model: "deepseek-r1-250528".to_string(),
            synthesis_model: "deepseek-r1-250528".to_string(),
            max_search_words: 5,
            max_planning_rounds: 5,
        }
    }
}

/// Outcome of a completed research session
#[derive(Debug, Clone)]
pub struct ResearchReport {
    pub answer: String,
    pub rounds: u32,
    pub reference_count: usize,
    pub termination: Option<TerminationReason>,
}

/// One research agent: a model capability plus a search backend
pub struct DeepResearch {
    model: Arc<dyn ChatModel>,
    executor: SearchExecutor,
    config: ResearchConfig,
}

impl DeepResearch {
    pub fn new(
        model: Arc<dyn ChatModel>,
        engine: Arc<dyn SearchEngine>,
        config: ResearchConfig,
    ) -> Self {
        Self {
            model,
            executor: SearchExecutor::new(engine),
            config,
        }
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Run the full state machine and return the final answer
    pub async fn run(&self, question: &str) -> Result<String, DeepSearchError> {
        Ok(self.run_with_report(question).await?.answer)
    }

    /// Run the full state machine and return the answer with session facts
    pub async fn run_with_report(
        &self,
        question: &str,
    ) -> Result<ResearchReport, DeepSearchError> {
        let mut session = Session::new(question);
        self.research(&mut session, None).await?;

        let messages = build_synthesis_messages(&session);
        let answer = self
            .model
            .complete(&self.config.synthesis_model, &messages)
            .await?;

        info!(
            rounds = session.round_count(),
            references = session.reference_count(),
            "Research session complete"
        );

        Ok(ResearchReport {
            answer,
            rounds: session.round_count(),
            reference_count: session.reference_count(),
            termination: session.termination,
        })
    }

    /// Run the state machine as a finite, non-restartable event stream
    ///
    /// Progress events for each round interleave with the token-level output
    /// of the synthesis step; the stream ends with [`ResearchEvent::Done`],
    /// or with one `Err` item when a model call fails. Dropping the receiver
    /// cancels the session at its next suspension point: no further rounds
    /// or model calls are issued.
    pub fn stream(
        self: Arc<Self>,
        question: String,
    ) -> ReceiverStream<Result<ResearchEvent, DeepSearchError>> {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut session = Session::new(&question);
            if let Err(err) = self.stream_session(&mut session, &tx).await {
                let _ = tx.send(Err(err)).await;
            }
        });

        ReceiverStream::new(rx)
    }

    async fn stream_session(
        &self,
        session: &mut Session,
        tx: &EventSender,
    ) -> Result<(), DeepSearchError> {
        if !self.research(session, Some(tx)).await? {
            return Ok(()); // consumer disconnected mid-research
        }
        if !emit(Some(tx), ResearchEvent::SynthesisStarted).await {
            return Ok(());
        }

        let messages = build_synthesis_messages(session);
        let mut tokens = self
            .model
            .complete_stream(&self.config.synthesis_model, &messages)
            .await?;

        while let Some(token) = tokens.next().await {
            let content = token?;
            if !emit(Some(tx), ResearchEvent::AnswerDelta { content }).await {
                return Ok(());
            }
        }

        emit(Some(tx), ResearchEvent::Done).await;
        Ok(())
    }

    /// Planning/searching/evaluating loop shared by both entry points
    ///
    /// Returns `Ok(false)` when the event consumer disconnected; the session
    /// is abandoned without further external calls.
    async fn research(
        &self,
        session: &mut Session,
        tx: Option<&EventSender>,
    ) -> Result<bool, DeepSearchError> {
        for round in 1..=self.config.max_planning_rounds {
            if !emit(tx, ResearchEvent::RoundStarted { round }).await {
                return Ok(false);
            }

            let messages = build_planning_messages(session, self.config.max_search_words);
            let reply = self
                .model
                .complete(&self.config.planning_model, &messages)
                .await?;

            let queries = match parse_plan(&reply, self.config.max_search_words) {
                PlanDecision::Sufficient => {
                    debug!(round = round, "Planner signalled sufficient evidence");
                    session.terminate(TerminationReason::EvidenceSufficient);
                    return Ok(true);
                }
                PlanDecision::Search(queries) => queries,
            };

            if !emit(
                tx,
                ResearchEvent::QueriesPlanned {
                    round,
                    queries: queries.clone(),
                },
            )
            .await
            {
                return Ok(false);
            }

            info!(round = round, queries = queries.len(), "Searching");
            // Full batch awaited here; the round commits atomically below
            let results = self.executor.search(&queries).await;
            session.commit_round(queries, results);

            if !emit(
                tx,
                ResearchEvent::SearchCompleted {
                    round,
                    result_count: session.rounds.last().map_or(0, |r| r.results.len()),
                    reference_count: session.reference_count(),
                },
            )
            .await
            {
                return Ok(false);
            }
        }

        session.terminate(TerminationReason::RoundBudgetExhausted);
        Ok(true)
    }
}

/// Send an event when streaming; `false` means the consumer went away
async fn emit(tx: Option<&EventSender>, event: ResearchEvent) -> bool {
    match tx {
        Some(tx) => tx.send(Ok(event)).await.is_ok(),
        None => true,
    }
}
