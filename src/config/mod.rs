//! Configuration module for podq.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    EmbeddingSettings, GeneralSettings, GenerationSettings, RetrievalSettings, Settings,
};
