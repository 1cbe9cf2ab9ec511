//! Stable names for suites and tests.
//!
//! A name is derived from the Rust type path once, at registration:
//! `fedcheck::suites::sp_metadata::test::CertificateMatches` becomes
//! `sp_metadata.certificate_matches`. Blacklists and reports are keyed by it.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::suite::{NamedSuite, NamedTest, Suite, Test};

/// Stripped from type paths before normalization.
pub const NAMESPACE: &str = "fedcheck::suites::";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("type `{0}` is not a registered suite or test")]
    Unregistered(String),
    #[error("no suite or test is registered as `{0}`")]
    UnknownName(String),
    #[error("`{0}` is not a well-formed name")]
    Malformed(String),
    #[error("`{name}` is registered as a {actual}, not a {expected}")]
    WrongKind {
        name: String,
        expected: Kind,
        actual: Kind,
    },
    #[error("`{name}` is registered twice (`{first}` and `{second}`)")]
    Duplicate {
        name: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Suite,
    Test,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Suite => write!(f, "suite"),
            Kind::Test => write!(f, "test"),
        }
    }
}

type TestFactory = fn() -> Box<dyn Test>;
type SuiteFactory = fn() -> Box<dyn Suite>;

#[derive(Clone, Copy)]
enum Factory {
    Suite(SuiteFactory),
    Test(TestFactory),
}

fn make_test<T: Test + Default>() -> Box<dyn Test> {
    Box::new(T::default())
}

fn make_suite<S: Suite + Default>() -> Box<dyn Suite> {
    Box::new(S::default())
}

pub struct Registration {
    name: String,
    type_path: &'static str,
    type_id: TypeId,
    factory: Factory,
}

impl Registration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn kind(&self) -> Kind {
        match self.factory {
            Factory::Suite(_) => Kind::Suite,
            Factory::Test(_) => Kind::Test,
        }
    }

    pub fn instantiate_test(&self) -> Result<Box<dyn Test>, NameError> {
        match self.factory {
            Factory::Test(make) => Ok(make()),
            Factory::Suite(_) => Err(self.wrong_kind(Kind::Test)),
        }
    }

    pub fn instantiate_suite(&self) -> Result<Box<dyn Suite>, NameError> {
        match self.factory {
            Factory::Suite(make) => Ok(make()),
            Factory::Test(_) => Err(self.wrong_kind(Kind::Suite)),
        }
    }

    fn wrong_kind(&self, expected: Kind) -> NameError {
        NameError::WrongKind {
            name: self.name.clone(),
            expected,
            actual: self.kind(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("type_path", &self.type_path)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Registry of every suite and test, populated once at startup.
#[derive(Default)]
pub struct NameResolver {
    registrations: Vec<Registration>,
    by_type: HashMap<TypeId, usize>,
    by_name: HashMap<String, usize>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_suite<S: Suite + Default>(&mut self) -> Result<&mut Self, NameError> {
        self.register(type_name::<S>(), TypeId::of::<S>(), Factory::Suite(make_suite::<S>))
    }

    pub fn register_test<T: Test + Default>(&mut self) -> Result<&mut Self, NameError> {
        self.register(type_name::<T>(), TypeId::of::<T>(), Factory::Test(make_test::<T>))
    }

    fn register(
        &mut self,
        type_path: &'static str,
        type_id: TypeId,
        factory: Factory,
    ) -> Result<&mut Self, NameError> {
        if self.by_type.contains_key(&type_id) {
            return Ok(self);
        }
        let name = normalize(type_path)?;
        if let Some(&existing) = self.by_name.get(&name) {
            return Err(NameError::Duplicate {
                name,
                first: self.registrations[existing].type_path.to_string(),
                second: type_path.to_string(),
            });
        }

        let index = self.registrations.len();
        self.by_type.insert(type_id, index);
        self.by_name.insert(name.clone(), index);
        self.registrations.push(Registration {
            name,
            type_path,
            type_id,
            factory,
        });
        Ok(self)
    }

    /// Name of a registered suite or test type.
    pub fn resolve_to_string<T: 'static>(&self) -> Result<&str, NameError> {
        self.by_type
            .get(&TypeId::of::<T>())
            .map(|&i| self.registrations[i].name.as_str())
            .ok_or_else(|| NameError::Unregistered(type_name::<T>().to_string()))
    }

    /// Registration carrying the given name.
    pub fn resolve_to_type(&self, name: &str) -> Result<&Registration, NameError> {
        if !is_well_formed(name) {
            return Err(NameError::Malformed(name.to_string()));
        }
        self.by_name
            .get(name)
            .map(|&i| &self.registrations[i])
            .ok_or_else(|| NameError::UnknownName(name.to_string()))
    }

    pub fn suite_name<S: Suite>(&self) -> Result<&str, NameError> {
        self.resolve_kind::<S>(Kind::Suite)
    }

    pub fn test_name<T: Test>(&self) -> Result<&str, NameError> {
        self.resolve_kind::<T>(Kind::Test)
    }

    fn resolve_kind<T: 'static>(&self, expected: Kind) -> Result<&str, NameError> {
        let name = self.resolve_to_string::<T>()?;
        let registration = self.resolve_to_type(name)?;
        if registration.kind() != expected {
            return Err(registration.wrong_kind(expected));
        }
        Ok(name)
    }

    /// Pair a test instance with its registered name.
    pub fn named<T: Test>(&self, test: T) -> Result<NamedTest, NameError> {
        Ok(NamedTest {
            name: self.test_name::<T>()?.to_string(),
            test: Box::new(test),
        })
    }

    /// Every registered suite, in registration order, with its tests.
    pub fn instantiate_suites(&self) -> Result<Vec<NamedSuite>, NameError> {
        self.registrations
            .iter()
            .filter(|r| r.kind() == Kind::Suite)
            .map(|r| {
                let suite = r.instantiate_suite()?;
                let tests = suite.tests(self)?;
                Ok(NamedSuite {
                    name: r.name.clone(),
                    suite,
                    tests,
                })
            })
            .collect()
    }

    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.iter()
    }
}

/// Turn a Rust type path into a dotted snake_case name.
pub fn normalize(type_path: &str) -> Result<String, NameError> {
    let valid_chars = type_path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
    if type_path.is_empty() || !valid_chars {
        return Err(NameError::Malformed(type_path.to_string()));
    }

    let path = type_path.strip_prefix(NAMESPACE).unwrap_or(type_path);
    let dotted = path.replace("::test::", ".").replace("::", ".");

    let mut name = String::with_capacity(dotted.len() + 8);
    let mut prev: Option<char> = None;
    for c in dotted.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            name.push('_');
        }
        name.push(c.to_ascii_lowercase());
        prev = Some(c);
    }

    if !is_well_formed(&name) {
        return Err(NameError::Malformed(type_path.to_string()));
    }
    Ok(name)
}

/// `segment(.segment)*` with lowercase ASCII, digits and `_`.
pub fn is_well_formed(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        })
}
