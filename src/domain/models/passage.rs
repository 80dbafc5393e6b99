//! Reading passage and writing prompt the student responds to.

use serde::{Deserialize, Serialize};

/// Passage shown to the student before writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Passage {
    /// Passage title
    #[serde(default = "default_title")]
    pub title: String,

    /// Passage body
    #[serde(default = "default_text")]
    pub text: String,

    /// Writing task given to the student
    #[serde(default = "default_writing_prompt")]
    pub writing_prompt: String,
}

fn default_title() -> String {
    "The Four-Day School Week".to_string()
}

fn default_text() -> String {
    "A growing number of rural districts have moved to a four-day school week. \
Supporters point to lower transportation and heating costs, easier teacher \
recruitment, and a free day that families can use for appointments or work. \
Critics answer that longer school days tire younger students, that parents must \
find childcare for the fifth day, and that some studies show small drops in math \
achievement. A few districts that tried the schedule have since returned to five \
days, while others report higher attendance and no change in test scores."
        .to_string()
}

fn default_writing_prompt() -> String {
    "Should your district adopt a four-day school week? Take a position and \
support it with details from the passage."
        .to_string()
}

impl Default for Passage {
    fn default() -> Self {
        Self {
            title: default_title(),
            text: default_text(),
            writing_prompt: default_writing_prompt(),
        }
    }
}

impl Passage {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        writing_prompt: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            writing_prompt: writing_prompt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_passage_is_populated() {
        let passage = Passage::default();
        assert!(!passage.title.is_empty());
        assert!(passage.text.contains("four-day"));
        assert!(passage.writing_prompt.starts_with("Should"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let passage: Passage = serde_yaml::from_str("title: Custom\n").unwrap();
        assert_eq!(passage.title, "Custom");
        assert_eq!(passage.writing_prompt, Passage::default().writing_prompt);
    }
}
