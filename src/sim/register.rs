//! Clocked state cells.

/// A named register holding the value committed at the previous clock edge.
///
/// The value is undefined (`None`) from construction until the first commit
/// following a reset. A staged next value stays invisible to readers until
/// [`Register::commit`], so every register in the system can be staged from
/// the same settled view before any of them changes.
#[derive(Clone, Debug)]
pub struct Register<T: Copy> {
    name: &'static str,
    current: Option<T>,
    staged: Option<T>,
}

impl<T: Copy> Register<T> {
    /// Creates an undefined register.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            current: None,
            staged: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Committed value, or `None` before the first reset.
    #[inline]
    pub fn get(&self) -> Option<T> {
        self.current
    }

    /// Committed value, substituting `fallback` while undefined.
    #[inline]
    pub fn read_or(&self, fallback: T) -> T {
        self.current.unwrap_or(fallback)
    }

    pub fn is_defined(&self) -> bool {
        self.current.is_some()
    }

    /// Stages the value to commit at the next edge. The last staged value wins.
    #[inline]
    pub fn stage(&mut self, next: T) {
        self.staged = Some(next);
    }

    /// Replaces the committed value with the staged one, if any.
    ///
    /// A register that was not staged this tick keeps its value.
    #[inline]
    pub fn commit(&mut self) {
        if let Some(next) = self.staged.take() {
            self.current = Some(next);
        }
    }
}
