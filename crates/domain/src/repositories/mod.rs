//! Repository Abstractions - Ports for Infrastructure Layer
//!
//! Defines the contracts between the Domain and Infrastructure layers

mod context_repository;

pub use context_repository::ContextRepository;
