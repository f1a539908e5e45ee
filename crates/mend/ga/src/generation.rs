use mend_ast::AstSet;

use crate::error::GenerationError;
use crate::gene::Gene;

/// Materializes a gene against the original program.
pub trait SourceCodeGeneration: Send + Sync {
    fn exec(&self, original: &AstSet, gene: &Gene) -> Result<AstSet, GenerationError>;
}

/// Applies each base in order on copy-on-write snapshots. The original is
/// never modified, so concurrent calls over one original are safe.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSourceCodeGeneration;

impl SourceCodeGeneration for DefaultSourceCodeGeneration {
    fn exec(&self, original: &AstSet, gene: &Gene) -> Result<AstSet, GenerationError> {
        let mut ast = original.clone();
        for (index, base) in gene.bases().iter().enumerate() {
            ast = ast
                .apply(&base.target, base.operation.to_edit())
                .map_err(|e| GenerationError::from_edit(index, &base.target, e))?;
        }
        Ok(ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::{Base, Operation};
    use mend_ast::{JavaAstConstruction, SourcePath, Statement, StatementKind, NodeId};

    fn original() -> AstSet {
        JavaAstConstruction::new()
            .parse_sources(&[(
                SourcePath::product("src/A.java"),
                "class A {\n    int f(int n) {\n        n++;\n        n--;\n        return n;\n    }\n}\n".into(),
            )])
            .unwrap()
    }

    fn text(ast: &AstSet) -> String {
        ast.source_files().into_iter().map(|f| f.text).collect()
    }

    fn donor(code: &str) -> Statement {
        Statement::new(NodeId(0), StatementKind::Expression(code.into()))
    }

    #[test]
    fn empty_gene_is_original() {
        let ast = original();
        let out = DefaultSourceCodeGeneration.exec(&ast, &Gene::empty()).unwrap();
        assert_eq!(text(&out), text(&ast));
        assert_eq!(out.fingerprint(), ast.fingerprint());
    }

    #[test]
    fn bases_apply_in_order() {
        let ast = original();
        let locs = ast.locations();
        let gene = Gene::new(vec![
            Base::new(locs[0].clone(), Operation::Delete),
            Base::new(locs[1].clone(), Operation::Replace { donor: donor("n += 2;") }),
        ]);
        let out = DefaultSourceCodeGeneration.exec(&ast, &gene).unwrap();
        let rendered = text(&out);
        assert!(!rendered.contains("n++;"));
        assert!(!rendered.contains("n--;"));
        assert!(rendered.contains("n += 2;"));
        assert!(text(&ast).contains("n++;"));
    }

    #[test]
    fn generation_is_pure() {
        let ast = original();
        let locs = ast.locations();
        let gene = Gene::new(vec![Base::new(
            locs[2].clone(),
            Operation::InsertBefore { donor: donor("n = n * 2;") },
        )]);
        let first = DefaultSourceCodeGeneration.exec(&ast, &gene).unwrap();
        let second = DefaultSourceCodeGeneration.exec(&ast, &gene).unwrap();
        assert_eq!(text(&first), text(&second));
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn replaced_target_is_ungenerable() {
        let ast = original();
        let locs = ast.locations();
        let gene = Gene::new(vec![
            Base::new(locs[0].clone(), Operation::Replace { donor: donor("n = 0;") }),
            Base::new(locs[0].clone(), Operation::Delete),
        ]);
        let err = DefaultSourceCodeGeneration.exec(&ast, &gene).unwrap_err();
        assert_eq!(
            err,
            GenerationError::TargetNotFound {
                index: 1,
                location: locs[0].clone()
            }
        );
    }
}
