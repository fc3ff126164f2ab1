use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use figment::providers::{Format, Toml};
use figment::Figment;

use evidb_core::config::{Config, ConfirmPolicy};
use evidb_core::traits::{ConfirmFilters, Facets};
use evidb_core::types::FilterSet;
use evidb_filter::{
    confirmer_for, narrow, AlwaysApply, FilterApplier, FilterInferencer, FilterTier, NeverApply, PromptConfirm,
};

struct Row {
    approach: Option<&'static str>,
    evidence: Option<&'static str>,
    domain: Option<&'static str>,
}

impl Facets for Row {
    fn approach(&self) -> Option<&str> { self.approach }
    fn evidence_type(&self) -> Option<&str> { self.evidence }
    fn domain(&self) -> Option<&str> { self.domain }
}

fn row(approach: Option<&'static str>, evidence: Option<&'static str>, domain: Option<&'static str>) -> Row {
    Row { approach, evidence, domain }
}

fn labels(items: &[&str]) -> Option<std::collections::BTreeSet<String>> {
    Some(items.iter().map(|s| (*s).to_string()).collect())
}

/// Counts how often the gate is consulted.
struct Counting(Arc<AtomicUsize>, bool);

impl ConfirmFilters for Counting {
    fn confirm(&self, _filters: &FilterSet) -> anyhow::Result<bool> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(self.1)
    }
}

#[test]
fn approach_requires_exactly_one_signal() {
    let inf = FilterInferencer::default();
    assert_eq!(inf.infer("Montessori classrooms").approach.as_deref(), Some("Montessori"));
    assert_eq!(inf.infer("TRADITIONAL schooling").approach.as_deref(), Some("Traditional"));
    assert_eq!(inf.infer("montessori versus traditional outcomes").approach, None, "ambiguous approach stays unset");
    assert_eq!(inf.infer("early childhood").approach, None);
}

#[test]
fn material_match_outranks_study_markers() {
    let inf = FilterInferencer::default();
    assert_eq!(inf.infer("research on the binomial cube").evidence_type.as_deref(), Some("Material"));
    assert_eq!(inf.infer("longitudinal studies of outcomes").evidence_type.as_deref(), Some("Study"));
    assert_eq!(inf.infer("a citation please").evidence_type.as_deref(), Some("Study"));
    assert_eq!(inf.infer("children and play").evidence_type, None);
}

#[test]
fn pink_tower_material_infers_material_without_domain() {
    let filters = FilterInferencer::default().infer("pink tower material");
    assert_eq!(filters.approach, None);
    assert_eq!(filters.evidence_type.as_deref(), Some("Material"));
    assert_eq!(filters.domain, None, "no domain trigger in the query");
}

#[test]
fn cognitive_attention_study_unions_implied_domains() {
    let filters = FilterInferencer::default().infer("montessori cognitive attention study");
    assert_eq!(filters.approach.as_deref(), Some("Montessori"));
    assert_eq!(filters.evidence_type.as_deref(), Some("Study"));
    let domain = filters.domain.expect("domain inferred");
    for label in ["Cognitive", "Behavioral/Cognitive", "Academic/Cognitive", "Behavioral"] {
        assert!(domain.contains(label), "missing {label} in {domain:?}");
    }
}

#[test]
fn triggers_match_as_plain_substrings() {
    let inf = FilterInferencer::default();
    // "socially" contains "social"; no word boundary is enforced
    let filters = inf.infer("Socially Engaged learners");
    assert_eq!(filters.domain, labels(&["Social", "Social/Emotional"]));
}

#[test]
fn configured_tables_replace_the_built_ins() {
    let toml = r#"
        [filters]
        version = 7
        material_label = "Material"
        materials = ["Golden Bead"]
        study_label = "Study"
        study_markers = ["trial"]
        [[filters.approaches]]
        label = "Reggio"
        triggers = ["reggio"]
        [[filters.domain_groups]]
        name = "Motor"
        triggers = ["motor"]
        implies = ["Motor"]
    "#;
    let config = Config::from_figment(Figment::new().merge(Toml::string(toml))).expect("config");
    let inf = FilterInferencer::from_config(&config).expect("inferencer");
    assert_eq!(inf.tables().version, 7);
    let filters = inf.infer("Reggio fine motor trial with golden beads");
    assert_eq!(filters.approach.as_deref(), Some("Reggio"));
    assert_eq!(filters.evidence_type.as_deref(), Some("Material"), "configured triggers are lowercased");
    assert_eq!(filters.domain, labels(&["Motor"]));
    assert_eq!(inf.infer("montessori").approach, None, "built-in approaches are gone");

    let defaults = FilterInferencer::from_config(&Config::from_figment(Figment::new()).expect("config")).expect("inferencer");
    assert_eq!(defaults.tables().version, evidb_filter::TABLE_VERSION);
}

#[test]
fn partial_table_override_keeps_remaining_defaults() {
    let toml = r#"
        [filters]
        materials = ["geometric cabinet"]
    "#;
    let config = Config::from_figment(Figment::new().merge(Toml::string(toml))).expect("config");
    let inf = FilterInferencer::from_config(&config).expect("partial tables load");
    assert_eq!(inf.tables().materials, vec!["geometric cabinet".to_string()]);
    assert_eq!(inf.tables().version, evidb_filter::TABLE_VERSION);

    let filters = inf.infer("montessori geometric cabinet");
    assert_eq!(filters.approach.as_deref(), Some("Montessori"), "built-in approaches still apply");
    assert_eq!(filters.evidence_type.as_deref(), Some("Material"));
    assert_eq!(inf.infer("pink tower").evidence_type, None, "material list was replaced");
    assert_eq!(inf.infer("attention study").evidence_type.as_deref(), Some("Study"));
}

#[test]
fn narrow_matches_case_insensitively_and_by_domain_membership() {
    let docs = vec![
        row(Some("montessori"), Some("STUDY"), Some("Cognitive")),
        row(Some("Montessori"), Some("Study"), Some("Social")),
        row(Some("Traditional"), Some("Study"), Some("Behavioral/Cognitive")),
        row(None, None, None),
    ];
    let filters = FilterSet {
        approach: Some("Montessori".to_string()),
        evidence_type: Some("study".to_string()),
        domain: labels(&["cognitive", "Behavioral/Cognitive"]),
    };
    assert_eq!(narrow(&docs, &filters), vec![0]);
    assert_eq!(narrow(&docs, &filters.approach_only()), vec![0, 1]);
    assert_eq!(narrow(&docs, &FilterSet::default()), vec![0, 1, 2, 3]);
}

#[test]
fn full_filters_apply_when_enough_candidates_remain() {
    let docs = vec![
        row(Some("Montessori"), Some("Study"), None),
        row(Some("Montessori"), Some("Study"), None),
        row(Some("Montessori"), Some("Material"), None),
        row(Some("Traditional"), Some("Study"), None),
    ];
    let filters = FilterSet { approach: Some("Montessori".into()), evidence_type: Some("Study".into()), domain: None };
    let out = FilterApplier::new(Box::new(AlwaysApply)).apply(&docs, &filters, 2).expect("apply");
    assert_eq!(out.tier, FilterTier::Full);
    assert_eq!(out.positions, vec![0, 1]);
}

#[test]
fn under_populated_filters_fall_back_to_approach_only() {
    let docs = vec![
        row(Some("Montessori"), Some("Study"), Some("Cognitive")),
        row(Some("Montessori"), Some("Material"), None),
        row(Some("Montessori"), None, Some("Academic")),
        row(Some("Traditional"), Some("Study"), Some("Cognitive")),
    ];
    let filters = FilterSet {
        approach: Some("Montessori".into()),
        evidence_type: Some("Study".into()),
        domain: labels(&["Cognitive"]),
    };
    let out = FilterApplier::new(Box::new(AlwaysApply)).apply(&docs, &filters, 2).expect("apply");
    assert_eq!(out.tier, FilterTier::ApproachOnly);
    assert_eq!(out.positions, narrow(&docs, &filters.approach_only()));
    assert_eq!(out.positions, vec![0, 1, 2]);
}

#[test]
fn fallback_without_approach_returns_whole_corpus() {
    let docs = vec![row(None, Some("Material"), None), row(None, None, None), row(None, None, None)];
    let filters = FilterSet { approach: None, evidence_type: Some("Material".into()), domain: None };
    let out = FilterApplier::new(Box::new(AlwaysApply)).apply(&docs, &filters, 2).expect("apply");
    assert_eq!(out.tier, FilterTier::Relaxed);
    assert_eq!(out.positions, vec![0, 1, 2]);
}

#[test]
fn approach_only_fallback_may_still_be_short() {
    let docs = vec![row(Some("Traditional"), None, None), row(Some("Montessori"), None, None)];
    let filters = FilterSet { approach: Some("Traditional".into()), evidence_type: Some("Study".into()), domain: None };
    let out = FilterApplier::new(Box::new(AlwaysApply)).apply(&docs, &filters, 5).expect("apply");
    assert_eq!(out.tier, FilterTier::ApproachOnly);
    assert_eq!(out.positions, vec![0], "no further relaxation beyond approach-only");
}

#[test]
fn gate_is_consulted_only_when_filters_exist() {
    let docs = vec![row(Some("Montessori"), None, None)];
    let calls = Arc::new(AtomicUsize::new(0));
    let applier = FilterApplier::new(Box::new(Counting(Arc::clone(&calls), false)));

    let out = applier.apply(&docs, &FilterSet::default(), 1).expect("apply");
    assert_eq!(out.tier, FilterTier::Unfiltered);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let filters = FilterSet { approach: Some("Traditional".into()), ..FilterSet::default() };
    let out = applier.apply(&docs, &filters, 1).expect("apply");
    assert_eq!(out.tier, FilterTier::Declined);
    assert_eq!(out.positions, vec![0], "rejection leaves the candidates unfiltered");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let out = FilterApplier::new(Box::new(NeverApply)).apply(&docs, &filters, 1).expect("apply");
    assert_eq!(out.tier, FilterTier::Declined);
}

#[test]
fn prompt_reasks_until_y_or_n() {
    let filters = FilterSet { approach: Some("Montessori".into()), ..FilterSet::default() };
    let gate = PromptConfirm::new(Cursor::new("maybe\n\n  Y \n"), Vec::new());
    assert!(gate.confirm(&filters).expect("confirm"));
    let (_, out) = gate.into_inner();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("approach=Montessori, evidence_type=none, domain=none"), "summary shown: {text}");
    assert_eq!(text.matches("apply filters? [y/n]").count(), 3);
    assert_eq!(text.matches("please answer").count(), 2);

    let gate = PromptConfirm::new(Cursor::new("N\n"), Vec::new());
    assert!(!gate.confirm(&filters).expect("confirm"));
}

#[test]
fn prompt_treats_end_of_input_as_no() {
    let filters = FilterSet { evidence_type: Some("Study".into()), ..FilterSet::default() };
    let gate = PromptConfirm::new(Cursor::new("whatever"), Vec::new());
    assert!(!gate.confirm(&filters).expect("confirm"));
}

#[test]
fn policies_map_to_gates() {
    let filters = FilterSet { approach: Some("Montessori".into()), ..FilterSet::default() };
    assert!(confirmer_for(ConfirmPolicy::Always).confirm(&filters).expect("always"));
    assert!(!confirmer_for(ConfirmPolicy::Never).confirm(&filters).expect("never"));
}
