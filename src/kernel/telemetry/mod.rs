//! Dialogue telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer. The reducer emits events but
//! never reads them back when deciding a transition.
//!
//! # PRIVACY INVARIANT
//! Events never carry user content (utterances, material names, amounts).
//! Only states, slots, outcomes and counts are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
