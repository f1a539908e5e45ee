use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a name refers to production code or test code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FqnKind {
    Target,
    Test,
}

/// A dotted Java-style name such as `example.BuggyCalculator` or
/// `example.BuggyCalculatorTest.test01`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FullyQualifiedName {
    pub value: String,
    pub kind: FqnKind,
}

impl FullyQualifiedName {
    pub fn target(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: FqnKind::Target,
        }
    }

    pub fn test(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: FqnKind::Test,
        }
    }

    /// Join a package and a simple type name. An empty package yields the bare name.
    pub fn from_parts(package: &str, simple_name: &str, kind: FqnKind) -> Self {
        let value = if package.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}.{}", package, simple_name)
        };
        Self { value, kind }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Everything before the last dot; empty for the default package.
    pub fn package_name(&self) -> &str {
        self.value
            .rfind('.')
            .map(|idx| &self.value[..idx])
            .unwrap_or("")
    }

    pub fn simple_name(&self) -> &str {
        self.value
            .rfind('.')
            .map(|idx| &self.value[idx + 1..])
            .unwrap_or(&self.value)
    }

    /// The owning type of a test method name (`a.BTest.test01` -> `a.BTest`).
    pub fn owner(&self) -> Option<FullyQualifiedName> {
        self.value.rfind('.').map(|idx| Self {
            value: self.value[..idx].to_string(),
            kind: self.kind,
        })
    }
}

impl fmt::Display for FullyQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_and_simple_name() {
        let fqn = FullyQualifiedName::target("example.util.Calc");
        assert_eq!(fqn.package_name(), "example.util");
        assert_eq!(fqn.simple_name(), "Calc");
    }

    #[test]
    fn default_package_is_empty() {
        let fqn = FullyQualifiedName::target("Calc");
        assert_eq!(fqn.package_name(), "");
        assert_eq!(fqn.simple_name(), "Calc");
        assert!(fqn.owner().is_none());
    }

    #[test]
    fn from_parts_joins() {
        let fqn = FullyQualifiedName::from_parts("example", "CalcTest", FqnKind::Test);
        assert_eq!(fqn.as_str(), "example.CalcTest");
        assert_eq!(fqn.kind, FqnKind::Test);
        let bare = FullyQualifiedName::from_parts("", "Calc", FqnKind::Target);
        assert_eq!(bare.as_str(), "Calc");
    }

    #[test]
    fn kind_participates_in_equality() {
        assert_ne!(
            FullyQualifiedName::target("a.B"),
            FullyQualifiedName::test("a.B")
        );
    }

    #[test]
    fn owner_of_test_method() {
        let m = FullyQualifiedName::test("example.CalcTest.test01");
        assert_eq!(m.owner().unwrap(), FullyQualifiedName::test("example.CalcTest"));
    }
}
