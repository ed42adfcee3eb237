use passlab_core::{condense, condense_with_outcomes, TrialOutcome};
use passlab_ir::{Context, PassCatalog, PassDefinition};
use passlab_tests::{extended_catalog, parse_sample, DIVIDE, FOLD, GENERIC, HELLO, REDUNDANT};

fn condensed_names(source: &str, catalog: &PassCatalog) -> Vec<&'static str> {
    condense(&parse_sample(source), catalog, &Context::default())
        .iter()
        .map(PassDefinition::name)
        .collect()
}

#[test]
fn samples_condense_to_the_passes_that_matter() {
    let catalog = PassCatalog::builtin();
    assert_eq!(condensed_names(HELLO, &catalog), vec!["strength-reduce"]);
    assert_eq!(
        condensed_names(FOLD, &catalog),
        vec!["canonicalize", "constant-fold", "dce"]
    );
    assert_eq!(
        condensed_names(REDUNDANT, &catalog),
        vec!["canonicalize", "cse"]
    );
    assert!(condensed_names(GENERIC, &catalog).is_empty());
    assert_eq!(condensed_names(DIVIDE, &catalog), vec!["strength-reduce"]);
}

#[test]
fn failing_passes_are_offered_and_no_ops_are_not() {
    let names = condensed_names(HELLO, &extended_catalog());
    assert_eq!(
        names,
        vec!["strength-reduce", "zz-always-fails", "zz-always-panics"]
    );
}

#[test]
fn outcomes_explain_every_pass() {
    let catalog = extended_catalog();
    let outcomes = condense_with_outcomes(&parse_sample(HELLO), &catalog, &Context::default());
    assert_eq!(outcomes.len(), catalog.len());
    for (def, outcome) in &outcomes {
        match def.name() {
            "strength-reduce" => assert_eq!(outcome, &TrialOutcome::Changed),
            "zz-always-fails" | "zz-always-panics" => {
                assert!(matches!(outcome, TrialOutcome::Failed(_)))
            }
            _ => assert_eq!(outcome, &TrialOutcome::Unchanged, "{}", def.name()),
        }
    }
}

#[test]
fn trials_do_not_chain() {
    // Each trial starts from the original program.
    let base = parse_sample(FOLD);
    let catalog = PassCatalog::builtin();
    let outcomes = condense_with_outcomes(&base, &catalog, &Context::default());
    let dce = outcomes
        .iter()
        .find(|(def, _)| def.name() == "dce")
        .expect("dce in catalog");
    assert_eq!(dce.1, TrialOutcome::Changed);
    assert_eq!(base, parse_sample(FOLD));
}
