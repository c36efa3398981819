use anyhow::Result;

/// Key-value storage for persisted wizard sessions. The hosting application decides
/// where the values actually live.
pub trait SessionStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}
