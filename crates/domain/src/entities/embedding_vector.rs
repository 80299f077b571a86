//! EmbeddingVector - Domain representation of vector embeddings
//!
//! Pure domain entity for vector operations

use crate::errors::{DomainError, DomainResult};
use crate::{EmbeddingDimensions, SimilarityScore};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking for unit length
pub const NORM_TOLERANCE: f32 = 1e-6;

/// Domain representation of an embedding vector
///
/// Contains business logic for vector operations
/// Independent of the embedding provider implementation details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    /// Vector components
    dimensions: Vec<f32>,

    /// Expected dimension count (business invariant)
    expected_dimensions: EmbeddingDimensions,
}

impl EmbeddingVector {
    /// Create new unit-length embedding vector with validation
    pub fn new(
        dimensions: Vec<f32>,
        expected_dimensions: EmbeddingDimensions,
    ) -> DomainResult<Self> {
        let vector = Self::from_raw(dimensions, expected_dimensions)?;

        // Business rule: vectors entering similarity search are normalized
        if !vector.is_normalized() {
            return Err(DomainError::InvalidEmbeddingVector(
                "Vector must be normalized".to_string(),
            ));
        }

        Ok(vector)
    }

    /// Create from raw provider output without normalization check
    pub fn from_raw(
        dimensions: Vec<f32>,
        expected_dimensions: EmbeddingDimensions,
    ) -> DomainResult<Self> {
        if dimensions.len() != expected_dimensions {
            return Err(DomainError::EmbeddingDimensionMismatch {
                expected: expected_dimensions,
                actual: dimensions.len(),
            });
        }

        if dimensions.is_empty() {
            return Err(DomainError::InvalidEmbeddingVector(
                "Vector cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            dimensions,
            expected_dimensions,
        })
    }

    /// Get vector components
    pub fn dimensions(&self) -> &[f32] {
        &self.dimensions
    }

    /// Get expected dimension count
    pub fn expected_dimensions(&self) -> EmbeddingDimensions {
        self.expected_dimensions
    }

    /// Consume the vector and return its components
    pub fn into_inner(self) -> Vec<f32> {
        self.dimensions
    }

    /// Dot product with another vector of the same dimension.
    ///
    /// For two unit vectors this is exactly their cosine similarity.
    pub fn dot(&self, other: &EmbeddingVector) -> DomainResult<SimilarityScore> {
        if self.expected_dimensions != other.expected_dimensions {
            return Err(DomainError::EmbeddingDimensionMismatch {
                expected: self.expected_dimensions,
                actual: other.expected_dimensions,
            });
        }

        Ok(self
            .dimensions
            .iter()
            .zip(&other.dimensions)
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Calculate cosine similarity without assuming unit length
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> DomainResult<SimilarityScore> {
        let dot_product = self.dot(other)?;
        let norm_a = self.magnitude();
        let norm_b = other.magnitude();

        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }

        Ok(dot_product / (norm_a * norm_b))
    }

    /// Get vector magnitude (L2 norm)
    pub fn magnitude(&self) -> f32 {
        l2_norm(&self.dimensions)
    }

    /// Return a copy rescaled to unit length.
    ///
    /// Fails with [`DomainError::DegenerateVector`] when the norm is zero or
    /// not finite; such a vector cannot take part in similarity search.
    pub fn normalized(&self) -> DomainResult<Self> {
        let mut copy = self.clone();
        copy.normalize()?;
        Ok(copy)
    }

    /// Normalize vector to unit length in place
    pub fn normalize(&mut self) -> DomainResult<()> {
        let magnitude = l2_norm_f64(&self.dimensions);

        if magnitude == 0.0 {
            return Err(DomainError::DegenerateVector(
                "Cannot normalize zero vector".to_string(),
            ));
        }
        if !magnitude.is_finite() {
            return Err(DomainError::DegenerateVector(format!(
                "Vector norm is not finite: {magnitude}"
            )));
        }

        for dimension in &mut self.dimensions {
            *dimension = (f64::from(*dimension) / magnitude) as f32;
        }

        Ok(())
    }

    /// Check if vector is normalized (business rule)
    pub fn is_normalized(&self) -> bool {
        (self.magnitude() - 1.0).abs() < NORM_TOLERANCE
    }
}

fn l2_norm(values: &[f32]) -> f32 {
    l2_norm_f64(values) as f32
}

/// Stays finite for every finite f32 input
fn l2_norm_f64(values: &[f32]) -> f64 {
    let sum: f64 = values.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    sum.sqrt()
}
