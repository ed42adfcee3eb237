//! Property tests for condensation and the textual round trip.

use passlab_core::{apply_pipeline, condense, run_pass, CurrentResult};
use passlab_frontend::parse;
use passlab_ir::passes::verify_module;
use passlab_ir::{Context, PassCatalog};
use passlab_tests::{arb_module, extended_catalog};
use proptest::prelude::*;

proptest! {
    #[test]
    fn printed_modules_reparse_to_the_same_module(module in arb_module()) {
        let printed = module.to_string();
        let reparsed = parse(&printed).expect("printed form parses");
        prop_assert_eq!(reparsed, module);
    }

    #[test]
    fn condensation_is_pure(module in arb_module()) {
        let catalog = extended_catalog();
        let ctx = Context::default();
        let snapshot = module.clone();
        let first = condense(&module, &catalog, &ctx);
        let second = condense(&module, &catalog, &ctx);
        prop_assert_eq!(first, second);
        prop_assert_eq!(module, snapshot);
    }

    #[test]
    fn condensation_is_an_ordered_subsequence(module in arb_module()) {
        let catalog = extended_catalog();
        let kept = condense(&module, &catalog, &Context::default());
        let mut remaining = catalog.iter();
        for def in &kept {
            prop_assert!(remaining.any(|candidate| candidate == def));
        }
    }

    #[test]
    fn kept_passes_fail_or_change_and_dropped_passes_do_nothing(module in arb_module()) {
        let catalog = extended_catalog();
        let kept = condense(&module, &catalog, &Context::default());
        for def in &catalog {
            let mut ctx = Context::with_all_dialects(true);
            let mut copy = module.clone();
            let interesting = match run_pass(def, &mut ctx, &mut copy) {
                Err(_) => true,
                Ok(()) => !copy.is_structurally_equivalent(&module),
            };
            prop_assert_eq!(interesting, kept.contains(def), "pass {}", def.name());
        }
        prop_assert!(kept.iter().any(|d| d.name() == "zz-always-fails"));
        prop_assert!(kept.iter().any(|d| d.name() == "zz-always-panics"));
        prop_assert!(!kept.iter().any(|d| d.name() == "aa-nothing"));
        prop_assert!(!kept.iter().any(|d| d.name() == "normalize-names"));
    }

    #[test]
    fn builtin_passes_preserve_validity(module in arb_module(), picks in prop::collection::vec(0usize..7, 0..5)) {
        let catalog = PassCatalog::builtin();
        let pipeline: Vec<_> = picks.iter().map(|i| catalog.as_slice()[*i]).collect();
        let source = module.to_string();
        let result = apply_pipeline(&source, &pipeline, &Context::default());
        match result {
            CurrentResult::Program(out) => {
                let ctx = Context::with_all_dialects(true);
                prop_assert!(verify_module(&ctx, &out).is_ok(), "invalid output:\n{}", out);
                let reprinted = parse(&out.to_string()).expect("output reparses");
                prop_assert!(reprinted.is_structurally_equivalent(&out));
            }
            other => prop_assert!(false, "pipeline failed: {:?}", other),
        }
    }
}
