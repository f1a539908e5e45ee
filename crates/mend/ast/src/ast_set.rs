use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::EditError;
use crate::hash::ContentHash;
use crate::project::SourcePath;
use crate::render::SourceFile;
use crate::statement::{Edit, NodeId, Statement};
use crate::unit::SourceUnit;

/// Address of one statement: the file it lives in and its node id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatementLocation {
    pub path: SourcePath,
    pub node: NodeId,
}

impl StatementLocation {
    pub fn new(path: SourcePath, node: NodeId) -> Self {
        Self { path, node }
    }
}

impl fmt::Display for StatementLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.node)
    }
}

/// The parsed source of one program version.
///
/// Units are shared between versions; [`AstSet::apply`] copies only the unit
/// it edits, so the original and every earlier version remain untouched.
#[derive(Clone, Debug, Default)]
pub struct AstSet {
    units: Vec<Arc<SourceUnit>>,
    next_id: u64,
}

impl AstSet {
    pub fn new(units: Vec<SourceUnit>) -> Self {
        let next_id = units.iter().map(SourceUnit::max_id).max().unwrap_or(0) + 1;
        Self {
            units: units.into_iter().map(Arc::new).collect(),
            next_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Arc<SourceUnit>] {
        &self.units
    }

    pub fn product_units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.units
            .iter()
            .map(Arc::as_ref)
            .filter(|u| u.path.is_product())
    }

    pub fn test_units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.units
            .iter()
            .map(Arc::as_ref)
            .filter(|u| !u.path.is_product())
    }

    pub fn unit(&self, path: &SourcePath) -> Option<&SourceUnit> {
        self.units
            .iter()
            .map(Arc::as_ref)
            .find(|u| &u.path == path)
    }

    pub fn find(&self, location: &StatementLocation) -> Option<&Statement> {
        self.unit(&location.path)?.find(location.node)
    }

    /// Every editable statement of the product code, in file then pre-order.
    pub fn locations(&self) -> Vec<StatementLocation> {
        self.product_units()
            .flat_map(|u| {
                u.statements()
                    .into_iter()
                    .filter(|s| !s.is_block())
                    .map(move |s| StatementLocation::new(u.path.clone(), s.id))
            })
            .collect()
    }

    /// Return a new set with `edit` applied at `location`.
    ///
    /// Donor statements are renumbered so node ids stay unique.
    pub fn apply(&self, location: &StatementLocation, edit: Edit) -> Result<AstSet, EditError> {
        let idx = self
            .units
            .iter()
            .position(|u| u.path == location.path)
            .ok_or_else(|| EditError::UnitNotFound(location.path.clone()))?;

        let mut next_id = self.next_id;
        let edit = match edit {
            Edit::InsertBefore(mut s) => {
                s.renumber(&mut next_id);
                Edit::InsertBefore(s)
            }
            Edit::Replace(mut s) => {
                s.renumber(&mut next_id);
                Edit::Replace(s)
            }
            Edit::Delete => Edit::Delete,
        };

        let mut unit = SourceUnit::clone(&self.units[idx]);
        if !unit.apply_edit(location.node, edit, &mut next_id) {
            return Err(EditError::TargetNotFound {
                path: location.path.clone(),
                node: location.node,
            });
        }

        let mut units = self.units.clone();
        units[idx] = Arc::new(unit);
        Ok(Self { units, next_id })
    }

    /// Render every unit to source text.
    pub fn source_files(&self) -> Vec<SourceFile> {
        self.units.iter().map(|u| SourceFile::render(u)).collect()
    }

    /// Hash over the rendered text of every unit.
    pub fn fingerprint(&self) -> ContentHash {
        let files = self.source_files();
        let parts: Vec<&[u8]> = files.iter().map(|f| f.fingerprint.as_bytes().as_slice()).collect();
        ContentHash::hash_parts(&parts)
    }
}
