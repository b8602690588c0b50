//! Global variables that text fields can bind to instead of holding a literal

use std::collections::BTreeMap;

use log::info;

use crate::error::GlobalVariableError;

/// Named key-value store behind the "load from global variable" picker
pub trait GlobalVariables {
    /// Variable names in display order
    fn names(&self) -> Vec<String>;

    fn get(&self, name: &str) -> Option<String>;

    fn delete(&mut self, name: &str) -> Result<(), GlobalVariableError>;
}

/// Store kept in memory, seeded from settings
#[derive(Debug, Clone, Default)]
pub struct InMemoryGlobals {
    variables: BTreeMap<String, String>,
}

impl InMemoryGlobals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl FromIterator<(String, String)> for InMemoryGlobals {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

impl GlobalVariables for InMemoryGlobals {
    fn names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    fn delete(&mut self, name: &str) -> Result<(), GlobalVariableError> {
        match self.variables.remove(name) {
            Some(_) => {
                info!("Deleted global variable '{}'", name);
                Ok(())
            }
            None => Err(GlobalVariableError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_sorted() {
        let mut globals = InMemoryGlobals::new();
        globals.insert("OPENAI_API_KEY", "sk-1");
        globals.insert("ANTHROPIC_API_KEY", "sk-2");
        assert_eq!(globals.names(), vec!["ANTHROPIC_API_KEY", "OPENAI_API_KEY"]);
    }

    #[test]
    fn test_delete_missing() {
        let mut globals = InMemoryGlobals::new();
        assert_eq!(
            globals.delete("nope"),
            Err(GlobalVariableError::NotFound("nope".to_string()))
        );
    }
}
