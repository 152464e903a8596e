//! `@@` quick-link completion: trigger detection, candidate construction and
//! link insertion.

pub mod apply;
pub mod candidate;
pub mod session;
pub mod source;
pub mod trigger;

pub use apply::{apply_candidate, link_edit, markdown_link, ApplyPlan, LinkEdit};
pub use candidate::{Candidate, CandidateKind};
pub use session::{Accept, CompletionSession, SessionEffect, SessionPhase};
pub use source::{build_candidates, should_query, CompletionList, CompletionSource, QuerySeq};
pub use trigger::{detect_trigger, TriggerSpan};
