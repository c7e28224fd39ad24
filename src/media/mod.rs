// ReelPress Media Workflow Modules
// Copyright (c) 2026 Xing_The_Creator | ReelPress

pub mod acquirer;
pub mod cache_dir;
pub mod fs_binding;
pub mod health;
pub mod orchestrator;
pub mod picker;
pub mod transcoder;
pub mod workflow;

pub use workflow::{PickOutcome, VideoWorkflow};
