pub mod advancement_policy;
pub mod feedback;
pub mod llm_coach;
pub mod llm_scorer;
pub mod prompts;
pub mod reflection_sequencer;

pub use advancement_policy::{Advancement, AdvancementPolicy};
pub use llm_coach::{CoachBudgets, LlmCoach};
pub use llm_scorer::LlmScorer;
pub use reflection_sequencer::ReflectionSequencer;
