// ReelPress Library Root
// Copyright (c) 2026 Xing_The_Creator | ReelPress

pub mod config;
pub mod error;
pub mod media;
pub mod preview;
pub mod state;
pub mod window;

pub use error::WorkflowError;
pub use state::{ListStore, RecordList, VideoRecord};
