use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifies a class of signature records: one named unit of build work
/// belonging to a recipe.
///
/// Task names are normalized with a `do_` prefix on construction, so
/// `TaskKey::new("zlib", "compile")` and `TaskKey::new("zlib", "do_compile")`
/// identify the same task.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskKey {
    recipe: String,
    task: String,
}

impl TaskKey {
    /// Create a task key, normalizing the task name.
    pub fn new(recipe: impl Into<String>, task: impl Into<String>) -> Result<Self, TypeError> {
        let recipe = recipe.into();
        let task = task.into();
        if recipe.is_empty() {
            return Err(TypeError::EmptyName("recipe"));
        }
        if task.is_empty() {
            return Err(TypeError::EmptyName("task"));
        }
        let task = if task.starts_with("do_") {
            task
        } else {
            format!("do_{task}")
        };
        Ok(Self { recipe, task })
    }

    /// The recipe (package) name.
    pub fn recipe(&self) -> &str {
        &self.recipe
    }

    /// The normalized task name, always carrying the `do_` prefix.
    pub fn task(&self) -> &str {
        &self.task
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.recipe, self.task)
    }
}
