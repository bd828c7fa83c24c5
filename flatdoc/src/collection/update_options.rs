/// Options for controlling an update issued through a model.
///
/// # Examples
///
/// ```rust
/// use flatdoc::collection::UpdateOptions;
///
/// // validators run by default
/// assert!(UpdateOptions::default().is_run_validators());
///
/// // skip patch validation
/// let options = UpdateOptions::new(false);
/// assert!(!options.is_run_validators());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    run_validators: bool,
}

impl UpdateOptions {
    /// Creates a new `UpdateOptions`.
    ///
    /// # Arguments
    ///
    /// * `run_validators` - If true, the patch is validated against the
    ///   model's schema with required-field checks relaxed
    pub fn new(run_validators: bool) -> Self {
        Self { run_validators }
    }

    /// Creates `UpdateOptions` that skip patch validation.
    pub fn without_validation() -> Self {
        UpdateOptions::new(false)
    }

    /// Returns whether the patch is validated before the update.
    pub fn is_run_validators(&self) -> bool {
        self.run_validators
    }
}

impl Default for UpdateOptions {
    fn default() -> Self {
        UpdateOptions::new(true)
    }
}
