use tracing::{debug, info};

use crate::ast_set::AstSet;
use crate::error::AstError;
use crate::parser::parse_unit;
use crate::project::{SourcePath, TargetProject};

/// Builds the initial [`AstSet`] of a project.
pub trait AstConstruction: Send + Sync {
    fn construct(&self, project: &TargetProject) -> Result<AstSet, AstError>;
}

/// Reads every `.java` file under the project's source roots and parses it.
#[derive(Clone, Debug, Default)]
pub struct JavaAstConstruction;

impl JavaAstConstruction {
    pub fn new() -> Self {
        Self
    }

    /// Parse in-memory sources. Node ids are unique across the whole set.
    pub fn parse_sources(&self, sources: &[(SourcePath, String)]) -> Result<AstSet, AstError> {
        let mut next_id = 1;
        let mut units = Vec::with_capacity(sources.len());
        for (path, text) in sources {
            let unit = parse_unit(path.clone(), text, &mut next_id)?;
            debug!(path = %path, fqn = %unit.fqn, "parsed source unit");
            units.push(unit);
        }
        Ok(AstSet::new(units))
    }
}

impl AstConstruction for JavaAstConstruction {
    fn construct(&self, project: &TargetProject) -> Result<AstSet, AstError> {
        let files = project.collect_sources()?;
        let mut sources = Vec::with_capacity(files.len());
        for (logical, absolute) in files {
            let text = std::fs::read_to_string(&absolute).map_err(|e| AstError::Io {
                path: absolute.clone(),
                source: e,
            })?;
            sources.push((logical, text));
        }
        let ast = self.parse_sources(&sources)?;
        info!(
            units = ast.units().len(),
            statements = ast.locations().len(),
            "constructed program AST"
        );
        Ok(ast)
    }
}
