//! Session invariants.
//!
//! Each check looks at a [`SessionSnapshot`] taken from the App after an
//! event and reports what is wrong with it, if anything. The [`SimDriver`]
//! runs the registry on every render, and property tests run it after every
//! generated step.
//!
//! [`SimDriver`]: crate::SimDriver

mod checks;
mod snapshot;

pub use checks::{
    ActiveContextHasNoUnread, ContextPartition, IdentityNeverTracked, ScreenFollowsConnection,
    StateClearedOutsideSession,
};
pub use snapshot::SessionSnapshot;

/// Outcome of one invariant check.
pub type InvariantResult = Result<(), Violation>;

/// A broken session invariant.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Which invariant failed.
    pub invariant: &'static str,
    /// The offending state, in words.
    pub message: String,
}

/// A property every [`SessionSnapshot`] must satisfy.
pub trait Invariant: Send + Sync {
    /// Short name used in violation reports.
    fn name(&self) -> &'static str;

    /// Check `state`.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;

    /// Violation attributed to this invariant.
    fn violation(&self, message: String) -> Violation {
        Violation { invariant: self.name(), message }
    }
}

/// Ordered set of invariants run together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// The five session invariants:
    ///
    /// - [`ActiveContextHasNoUnread`]
    /// - [`IdentityNeverTracked`]
    /// - [`ContextPartition`]
    /// - [`StateClearedOutsideSession`]
    /// - [`ScreenFollowsConnection`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(ActiveContextHasNoUnread);
        registry.add(IdentityNeverTracked);
        registry.add(ContextPartition);
        registry.add(StateClearedOutsideSession);
        registry.add(ScreenFollowsConnection);
        registry
    }

    /// Register another check.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every check and collect all violations.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        for invariant in &self.invariants {
            if let Err(violation) = invariant.check(state) {
                violations.push(violation);
            }
        }

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Like [`check_all`](Self::check_all), but panics with every violation
    /// and `context` (usually the step that produced `state`).
    #[allow(clippy::panic, reason = "test assertion helper")]
    pub fn assert_all(&self, state: &SessionSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
        panic!("session invariants broken {context}:\n  {}", report.join("\n  "));
    }

    /// Names of the registered checks, in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.invariants.iter().map(|invariant| invariant.name()).collect()
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
