//! Classifier
//! Heuristic keyword tagger assigning each state a presentation category

use serde::{Deserialize, Serialize};


/// Semantic grouping of a state, derived from its name and annotation flag.
/// Never persisted; recomputed whenever the graph is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Core locomotion/movement states
    PrimaryMotion,
    /// Combat or contested-interaction states
    Conflict,
    /// Reaction states (hit, stagger, recovery)
    Response,
    /// No keyword match, but the state carries an annotation
    Highlighted,
    /// Everything else
    Other,
}

/// Keyword lists driving [`classify`](ClassifierRules::classify).
///
/// The taxonomy is plain data so hosts can extend it without touching the
/// engine; `Default` carries the built-in lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRules {
    pub response: Vec<String>,
    pub conflict: Vec<String>,
    pub primary_motion: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            response: keywords(&["hit", "hurt", "damage", "stagger", "knock", "react", "stun"]),
            conflict: keywords(&["attack", "combat", "fight", "block", "parry", "dodge"]),
            primary_motion: keywords(&[
                "idle", "walk", "run", "sprint", "jump", "fall", "land", "crouch", "move",
            ]),
        }
    }
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl ClassifierRules {
    /// Classify one state from its name (case-insensitive) and annotation flag.
    ///
    /// Rule priority, first match wins: response, then conflict, then
    /// primary motion, then the annotation flag. Reaction semantics outrank
    /// motion ones, so a name like "hit-while-running" reads as a response.
    pub fn classify(&self, name: &str, has_annotation: bool) -> Category {
        let lowered = name.to_lowercase();

        if contains_any(&lowered, &self.response) {
            Category::Response
        } else if contains_any(&lowered, &self.conflict) {
            Category::Conflict
        } else if contains_any(&lowered, &self.primary_motion) {
            Category::PrimaryMotion
        } else if has_annotation {
            Category::Highlighted
        } else {
            Category::Other
        }
    }
}

fn contains_any(lowered_name: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| lowered_name.contains(k.as_str()))
}
