//! Domain Layer - FinChat business objects
//!
//! Contains ONLY pure business logic with no dependencies on:
//! - Infrastructure (document stores, file systems, networks)
//! - Frameworks (web, CLI)
//! - External systems (embedding and generation services)
//!
//! Layout:
//! - Entities: Transaction, FinancialContext, EmbeddingVector
//! - Value Objects: TransactionCategory
//! - Repository Abstractions: ContextRepository (port to the document store)

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use entities::{EmbeddingVector, FinancialContext, Goal, Policy, Transaction};
pub use errors::{DomainError, DomainResult};
pub use repositories::ContextRepository;
pub use value_objects::TransactionCategory;

/// Domain-specific type aliases
pub type EmbeddingDimensions = usize;
pub type SimilarityScore = f32;
