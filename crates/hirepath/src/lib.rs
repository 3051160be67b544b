//! Applicant tracking core: positions, interview flows, candidates, and the
//! stage-transition workflow that moves applications through a hiring pipeline.

pub mod board;
pub mod client;
pub mod config;
pub mod error;
pub mod hiring;
pub mod telemetry;
