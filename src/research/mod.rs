//! The multi-round research loop
//!
//! Planning, searching, and synthesis for one session, plus the event stream
//! that exposes a running session incrementally.

mod events;
mod orchestrator;
mod planner;
mod session;

pub use events::{ChatCompletionChunk, ChunkChoice, ChunkDelta, ResearchEvent};
pub use orchestrator::{DeepResearch, ResearchConfig, ResearchReport};
pub use planner::{build_planning_messages, build_synthesis_messages, parse_plan, PlanDecision};
pub use session::{Round, Session, TerminationReason};
