use std::collections::HashMap;

use anyhow::Result;
use base::stores::session_store::SessionStore;

#[derive(Default)]
pub struct InMemorySessionStore {
    values: HashMap<String, String>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);

        Ok(())
    }
}
