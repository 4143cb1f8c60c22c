//! The per-target scan stages.
//!
//! A scan runs these stages in order, each one pure except the fetch:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Fetch | [`fetch`] | page HTML or `FetchError` |
//! | Match | [`matcher`] | first heading/link containing the keyword |
//! | Classify | [`sentiment`] | lexicon score and label |
//! | Gate | [`gate`] | `NoMatch`, `AlreadyNotified` or `NewMatch` |
//!
//! The scheduler drives the stages and owns notification and persistence.

pub mod fetch;
pub mod gate;
pub mod matcher;
pub mod sentiment;
