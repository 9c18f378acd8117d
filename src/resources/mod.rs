//! Idempotent resource primitives (check + apply pattern).
pub mod executable;
pub mod file;
pub mod helpers;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// This method should:
    /// - Create parent directories if needed
    /// - Update the resource to match the desired state
    /// - Return the appropriate `ResourceChange` result
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// permission issues, invalid paths, or other system errors.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource (file contents, permission bits).
///
/// # Examples
///
/// ```
/// use dots::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "644".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// assert_ne!(wrong, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use dots::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}

/// Unified interface for resources that can be checked and applied.
///
/// # Examples
///
/// ```ignore
/// // All resources follow the same check-then-apply pattern:
/// if resource.needs_change()? {
///     resource.apply()?;
/// }
/// ```
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined due to I/O failures,
    /// permission issues, or other system errors.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state cannot be determined (propagates errors from
    /// `current_state()`).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }

    /// Apply the resource only when [`Resource::needs_change`] says so.
    ///
    /// # Errors
    ///
    /// Propagates errors from `current_state()` and `apply()`.
    fn ensure(&self) -> Result<ResourceChange> {
        if self.needs_change()? {
            self.apply()
        } else {
            Ok(ResourceChange::AlreadyCorrect)
        }
    }
}
