//! Configuration access port trait.

/// Read-only view over sectioned key/value settings.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// `Ok(None)` when the key is absent, `Err` with a reason when it is
    /// present but not a whole number.
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
}
