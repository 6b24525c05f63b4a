use serde::{Deserialize, Serialize};

/// Identifier assigned by whoever owns the collection a [`Todo`] lives in.
pub type TodoId = u64;

/// A single task entry.
///
/// The record is passive: it does not check that `text` is non-empty and it
/// does not enforce that `id` is unique. Both are up to the code holding the
/// collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Todo {
    pub text: String,
    pub done: bool,
    /// `None` means "not specified", which is not the same as `Some(false)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interact: Option<bool>,
    pub id: TodoId,
}

impl Todo {
    pub fn new(id: TodoId, text: impl Into<String>) -> Todo {
        Todo {
            text: text.into(),
            done: false,
            interact: None,
            id,
        }
    }

    pub fn with_interact(mut self, interact: bool) -> Todo {
        self.interact = Some(interact);
        self
    }

    // Two entries with the same id are the same logical task, whatever their other fields say.
    pub fn same_task(&self, other: &Todo) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_leaves_interact_unspecified() {
        let todo = Todo::new(1, "buy milk");
        assert_eq!(todo.text, "buy milk");
        assert!(!todo.done);
        assert_eq!(todo.interact, None);
        assert_eq!(todo.id, 1);
    }

    #[test]
    fn test_with_interact_false_is_not_absent() {
        let todo = Todo::new(3, "water plants").with_interact(false);
        assert_eq!(todo.interact, Some(false));
        assert_ne!(todo, Todo::new(3, "water plants"));
    }

    #[test]
    fn test_same_task_compares_ids_only() {
        let a = Todo::new(7, "call mom");
        let mut b = Todo::new(7, "call mom tonight");
        b.done = true;
        let c = Todo::new(8, "call mom");

        assert!(a.same_task(&b));
        assert!(!a.same_task(&c));
    }
}
