//! Steer - lifecycle-aware intent routing for assistant slash commands

pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod intent;
pub mod state;
pub mod telemetry;

pub use intent::{
    ClassificationResult, ClassifierConfig, CommandMetadata, InitOptions, IntentClassifier,
    MatchKind, ProjectState,
};
