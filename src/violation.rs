use std::fmt;

/// Sink for human-readable constraint violations.
///
/// Writers are append-only. Nothing is deduplicated or reordered.
pub trait ViolationWriter {
    fn add(&mut self, message: String);

    /// Add a message qualified by a (possibly dotted) path.
    fn add_at(&mut self, path: &str, message: String) {
        self.add(format!("{}: {}", path, message));
    }
}

/// Collects violations in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }
}

impl ViolationWriter for Violations {
    fn add(&mut self, message: String) {
        self.messages.push(message);
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}", message)?;
        }
        Ok(())
    }
}

/// Prefixes everything written through it with a path segment.
///
/// Nesting joins segments with `.`, so a width problem inside the first logo
/// reads `Logo #0.width: ...` without the logo knowing where it lives.
pub struct SubpathWriter<'w> {
    inner: &'w mut dyn ViolationWriter,
    path: String,
}

impl<'w> SubpathWriter<'w> {
    pub fn new(inner: &'w mut dyn ViolationWriter, path: impl Into<String>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl ViolationWriter for SubpathWriter<'_> {
    fn add(&mut self, message: String) {
        self.inner.add_at(&self.path, message);
    }

    fn add_at(&mut self, path: &str, message: String) {
        let joined = format!("{}.{}", self.path, path);
        self.inner.add_at(&joined, message);
    }
}
