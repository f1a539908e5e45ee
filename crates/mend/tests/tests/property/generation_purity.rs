//! Property tests: materializing a gene never touches the original and
//! always yields the same program for the same gene.

use mend_ast::{AstSet, JavaAstConstruction, NodeId, SourcePath, Statement, StatementKind};
use mend_build::{ArtifactCache, ProjectBuilder, SimulatedCompiler};
use mend_exec::{ExecutionTargets, SimulatedTestExecutor};
use mend_fl::Ochiai;
use mend_ga::{
    Base, DefaultCodeValidation, DefaultSourceCodeGeneration, ElitistSelection, Gene,
    HistoricalElement, Operation, SourceCodeGeneration, Strategies, VariantRequest, VariantStore,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

const SOURCE: &str = "class P {\n    int f(int n) {\n        n++;\n        if (n > 3) {\n            n--;\n        }\n        log(n);\n        return n;\n    }\n}\n";

fn original() -> AstSet {
    JavaAstConstruction::new()
        .parse_sources(&[(SourcePath::product("src/P.java"), SOURCE.into())])
        .unwrap()
}

fn gene(ast: &AstSet, picks: &[(usize, u8)]) -> Gene {
    let locations = ast.locations();
    Gene::new(
        picks
            .iter()
            .map(|(i, op)| {
                let donor = Statement::new(NodeId(0), StatementKind::Expression("m();".into()));
                let operation = match op % 3 {
                    0 => Operation::Delete,
                    1 => Operation::InsertBefore { donor },
                    _ => Operation::Replace { donor },
                };
                Base::new(locations[i % locations.len()].clone(), operation)
            })
            .collect(),
    )
}

fn arb_picks() -> impl Strategy<Value = Vec<(usize, u8)>> {
    prop::collection::vec((0usize..16, 0u8..3), 0..5)
}

proptest! {
    /// The original's rendered program is unchanged by any generation.
    #[test]
    fn generation_leaves_original_untouched(picks in arb_picks()) {
        let original = original();
        let before = original.fingerprint();
        let _ = DefaultSourceCodeGeneration.exec(&original, &gene(&original, &picks));
        prop_assert_eq!(original.fingerprint(), before);
    }

    /// Generating the same gene twice gives identical programs or the same failure.
    #[test]
    fn generation_is_deterministic(picks in arb_picks()) {
        let original = original();
        let gene = gene(&original, &picks);
        let first = DefaultSourceCodeGeneration.exec(&original, &gene);
        let second = DefaultSourceCodeGeneration.exec(&original, &gene);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a.fingerprint(), b.fingerprint()),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "generation outcome changed between calls"),
        }
    }

    /// The empty gene is the original program.
    #[test]
    fn empty_gene_is_identity(_seed in 0u8..4) {
        let original = original();
        let same = DefaultSourceCodeGeneration.exec(&original, &Gene::empty()).unwrap();
        prop_assert_eq!(same.fingerprint(), original.fingerprint());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// A variant is always younger than the initial program it derives from.
    #[test]
    fn derived_variants_belong_to_a_later_generation(steps in 0u32..4, index in 0usize..16) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let original = original();
            let strategies = Strategies {
                generation: Arc::new(DefaultSourceCodeGeneration),
                builder: ProjectBuilder::new(
                    Arc::new(SimulatedCompiler::new()),
                    Arc::new(ArtifactCache::new()),
                ),
                executor: Arc::new(SimulatedTestExecutor::all_pass()),
                fault_localization: Arc::new(Ochiai),
                validation: Arc::new(DefaultCodeValidation),
                selection: Arc::new(ElitistSelection::new(4)),
                targets: ExecutionTargets::from_ast(&original),
                test_time_limit: Duration::from_secs(1),
                parallelism: 1,
                skip_duplicate_sources: false,
            };
            let mut store = VariantStore::new(original, strategies).await;
            for _ in 0..steps {
                store.proceed_next_generation();
            }
            let target = store.original().locations();
            let target = target[index % target.len()].clone();
            let initial = Arc::clone(store.initial_variant());
            let base = Base::new(target, Operation::Delete);
            let request = VariantRequest::new(
                Gene::empty().append(base.clone()),
                HistoricalElement::Mutation { parent: Arc::clone(&initial), base },
            );
            let variant = store.create_variant(request).await.unwrap();
            assert!(variant.generation > initial.generation);
            assert_eq!(variant.generation.get(), steps + 1);
        });
    }
}
