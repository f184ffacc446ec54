//! Learnpath - Conversational Learning-Path Curation Backend
//!
//! This crate turns free-form "I want to learn X" conversations into
//! staged, validated video curricula through dialogue-driven intent
//! resolution and AI-assisted curation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
