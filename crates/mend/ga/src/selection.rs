use dashmap::DashMap;
use mend_ast::{FullyQualifiedName, ReuseCandidate, Statement};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::roulette::Roulette;

/// Picks donor statements for insert and replace operations.
pub trait CandidateSelection: Send + Sync {
    /// Draw a donor for an edit inside the unit named `fqn`.
    fn exec(&self, fqn: &FullyQualifiedName, rng: &mut dyn RngCore) -> Option<Statement>;
}

/// How far from the edited unit donors may come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReuseScope {
    Project,
    #[default]
    Package,
    File,
}

impl fmt::Display for ReuseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Package => write!(f, "package"),
            Self::File => write!(f, "file"),
        }
    }
}

fn donor_weight(statement: &Statement) -> f64 {
    let size = statement.structural_size().max(1) as f64;
    (1.0 / size).powi(2)
}

fn roulette_over(statements: Vec<Statement>) -> Arc<Roulette<Statement>> {
    Arc::new(Roulette::new(statements, donor_weight))
}

/// Donor pool weighted by `(1 / structural size)^2`.
///
/// The scoped indexes are built once from the candidate list. Scoped
/// roulettes are created on first use and memoized; a scope without
/// candidates falls back to the whole project.
pub struct RouletteStatementSelection {
    scope: ReuseScope,
    global: Arc<Roulette<Statement>>,
    by_package: HashMap<String, Vec<Statement>>,
    by_fqn: HashMap<FullyQualifiedName, Vec<Statement>>,
    memo: DashMap<String, Arc<Roulette<Statement>>>,
}

impl RouletteStatementSelection {
    pub fn new(candidates: Vec<ReuseCandidate>, scope: ReuseScope) -> Self {
        let mut by_package: HashMap<String, Vec<Statement>> = HashMap::new();
        let mut by_fqn: HashMap<FullyQualifiedName, Vec<Statement>> = HashMap::new();
        let mut all = Vec::with_capacity(candidates.len());
        for c in candidates {
            by_package
                .entry(c.package_name.clone())
                .or_default()
                .push(c.statement.clone());
            by_fqn.entry(c.fqn.clone()).or_default().push(c.statement.clone());
            all.push(c.statement);
        }
        debug!(
            candidates = all.len(),
            packages = by_package.len(),
            units = by_fqn.len(),
            %scope,
            "reuse pool built"
        );
        Self {
            scope,
            global: roulette_over(all),
            by_package,
            by_fqn,
            memo: DashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }

    pub fn len(&self) -> usize {
        self.global.len()
    }

    pub fn scope(&self) -> ReuseScope {
        self.scope
    }

    fn scoped(&self, fqn: &FullyQualifiedName) -> Arc<Roulette<Statement>> {
        let (key, pool) = match self.scope {
            ReuseScope::Project => return Arc::clone(&self.global),
            ReuseScope::Package => {
                let package = fqn.package_name();
                if package.is_empty() {
                    return Arc::clone(&self.global);
                }
                (format!("package:{package}"), self.by_package.get(package))
            }
            ReuseScope::File => (format!("fqn:{fqn}"), self.by_fqn.get(fqn)),
        };
        let Some(pool) = pool.filter(|p| !p.is_empty()) else {
            return Arc::clone(&self.global);
        };
        self.memo
            .entry(key)
            .or_insert_with(|| roulette_over(pool.clone()))
            .clone()
    }
}

impl CandidateSelection for RouletteStatementSelection {
    fn exec(&self, fqn: &FullyQualifiedName, rng: &mut dyn RngCore) -> Option<Statement> {
        self.scoped(fqn).exec(rng).cloned()
    }
}
