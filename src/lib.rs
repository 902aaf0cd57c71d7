//! Fieldtalk - LLM-driven interview engine for experience-sampling research
//!
//! This crate implements structured, adaptive interview conversations:
//! it greets a participant, asks a configured opening probe, generates
//! follow-up questions aligned to research goals, and decides when the
//! interview has gathered enough material.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
