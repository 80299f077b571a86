//! Prompt composition for grounded answers
//!
//! Pure and deterministic: the same query and ranking always produce the
//! same payload.

use memory::ScoredTransaction;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const PERSONA: &str = "You are FinChat, an expert AI financial co-pilot.\n\
Your goal is to provide data-driven, insightful advice based on the user's actual spending.";

const GROUNDING: &str = "When answering the user's question, you MUST base your answer on the \
following highly relevant transactions that were found in their financial history:";

const CLOSING: &str =
    "Use this specific data to provide a concise, helpful, and direct response to the user's message.";

/// System and user text handed to the generation provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub system_prompt: String,
    pub user_message: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer {
    include_details: bool,
}

impl PromptComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append amount, date and category to every transaction line
    pub fn with_details(mut self, include_details: bool) -> Self {
        self.include_details = include_details;
        self
    }

    /// Build the payload, listing `results` in rank order.
    ///
    /// Any number of results is accepted, including none.
    pub fn compose(&self, query: &str, results: &[ScoredTransaction<'_>]) -> PromptPayload {
        let mut system_prompt = String::new();
        system_prompt.push_str(PERSONA);
        system_prompt.push_str("\n\n");
        system_prompt.push_str(GROUNDING);
        system_prompt.push('\n');

        for (rank, hit) in results.iter().enumerate() {
            let tx = hit.transaction;
            // Writing into a String cannot fail
            let _ = write!(system_prompt, "- Transaction {}: \"{}\"", rank + 1, tx.description);
            if self.include_details {
                let _ = write!(
                    system_prompt,
                    " (amount: {:.2}, date: {}",
                    tx.amount,
                    tx.date.format("%Y-%m-%d")
                );
                if let Some(category) = tx.category {
                    let _ = write!(system_prompt, ", category: {category}");
                }
                system_prompt.push(')');
            }
            system_prompt.push('\n');
        }

        system_prompt.push('\n');
        system_prompt.push_str(CLOSING);

        PromptPayload {
            system_prompt,
            user_message: query.to_string(),
        }
    }
}
