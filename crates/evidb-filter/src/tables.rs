//! Trigger tables for filter inference.
//!
//! The built-in tables are plain data; a deployment can replace them through
//! the `filters` configuration key without touching the inference code.
//! Triggers are matched as lowercase substrings of the lowercased query.

use serde::{Deserialize, Serialize};

/// Bump when the built-in trigger lists change meaningfully.
pub const TABLE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproachMarker {
    pub label: String,
    pub triggers: Vec<String>,
}

/// A named trigger list. When any trigger matches, every label in `implies`
/// joins the inferred domain set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainGroup {
    pub name: String,
    pub triggers: Vec<String>,
    pub implies: Vec<String>,
}

/// Missing fields fall back to the built-in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTables {
    pub version: u32,
    /// Approach labels are mutually exclusive: more than one firing means no constraint.
    pub approaches: Vec<ApproachMarker>,
    pub material_label: String,
    pub materials: Vec<String>,
    pub study_label: String,
    pub study_markers: Vec<String>,
    pub domain_groups: Vec<DomainGroup>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn group(name: &str, triggers: &[&str], implies: &[&str]) -> DomainGroup {
    DomainGroup { name: name.to_string(), triggers: strings(triggers), implies: strings(implies) }
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            version: TABLE_VERSION,
            approaches: vec![
                ApproachMarker { label: "Montessori".to_string(), triggers: strings(&["montessori"]) },
                ApproachMarker { label: "Traditional".to_string(), triggers: strings(&["traditional"]) },
            ],
            material_label: "Material".to_string(),
            materials: strings(&[
                "material",
                "pink tower", "metal inset", "stamp game", "moveable alphabet", "movable alphabet",
                "spindle box", "binomial cube", "trinomial cube", "knobbed cylinder",
                "golden bead", "sandpaper letter", "red rod", "long rod",
                "brown stair", "color tablet", "colour tablet", "sound cylinder", "rough and smooth board",
                "smooth board", "rough board", "wooden cylinder", "geometry cabinet",
                "glass bead", "fraction inset", "inset", "botany cabinet",
                "divergent and convergent lines",
            ]),
            study_label: "Study".to_string(),
            study_markers: strings(&["study", "studies", "research", "citation"]),
            domain_groups: vec![
                group(
                    "Cognitive",
                    &["cognitive", "cognition", "memory", "executive", "reasoning", "problem solving", "concentration"],
                    &["Cognitive", "Behavioral/Cognitive", "Academic/Cognitive"],
                ),
                group(
                    "Behavioral",
                    &["behavior", "behaviour", "self-regulation", "self regulation", "motivation", "attention", "discipline", "impulse"],
                    &["Behavioral", "Behavioral/Cognitive"],
                ),
                group(
                    "Social",
                    &["social", "peer", "collaborat", "cooperat", "empathy", "emotional", "community"],
                    &["Social", "Social/Emotional"],
                ),
                group(
                    "Academic",
                    &["academic", "math", "literacy", "reading", "writing", "achievement", "test score", "vocabulary"],
                    &["Academic", "Academic/Cognitive"],
                ),
                group(
                    "Environment",
                    &["environment", "classroom", "mixed-age", "mixed age", "freedom of movement"],
                    &["Environment"],
                ),
            ],
        }
    }
}

impl KeywordTables {
    /// Copy with every trigger lowercased and trimmed, empty triggers removed.
    pub(crate) fn prepared(mut self) -> Self {
        fn clean(list: &mut Vec<String>) {
            *list = list.iter().map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty()).collect();
        }
        for marker in &mut self.approaches { clean(&mut marker.triggers); }
        clean(&mut self.materials);
        clean(&mut self.study_markers);
        for g in &mut self.domain_groups { clean(&mut g.triggers); }
        self
    }
}
