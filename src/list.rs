use crate::error::{Error, Result};
use crate::models::{Todo, TodoId};
use tracing::debug;

/// In-memory collection of todos that owns id assignment.
///
/// Ids start at 1 and only move forward, so an id freed by [`TodoList::remove`]
/// is never handed out again. Once an entry holds `TodoId::MAX` there is no id
/// left to hand out and [`TodoList::add`] fails.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoList {
    todos: Vec<Todo>,
    // `None` once the id space is used up.
    next_id: Option<TodoId>,
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoList {
    pub fn new() -> TodoList {
        TodoList {
            todos: Vec::new(),
            next_id: Some(1),
        }
    }

    /// Builds a list from decoded records. Later records win when ids repeat.
    pub fn from_todos(todos: Vec<Todo>) -> TodoList {
        let mut list = TodoList::new();
        for todo in todos {
            list.upsert(todo);
        }
        list
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn into_todos(self) -> Vec<Todo> {
        self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// The id the next [`TodoList::add`] will use, if any is left.
    pub fn next_id(&self) -> Option<TodoId> {
        self.next_id
    }

    pub fn add(&mut self, text: impl Into<String>) -> Result<TodoId> {
        let id = self.next_id.ok_or(Error::IdsExhausted)?;
        if self.get(id).is_some() {
            return Err(Error::IdTaken(id));
        }
        self.todos.push(Todo::new(id, text));
        self.next_id = id.checked_add(1);
        debug!(id, "added todo");
        Ok(id)
    }

    /// Inserts `todo`, replacing any entry that is the same task.
    pub fn upsert(&mut self, todo: Todo) {
        if let Some(next) = self.next_id {
            if todo.id >= next {
                self.next_id = todo.id.checked_add(1);
            }
        }
        match self.todos.iter_mut().find(|t| t.same_task(&todo)) {
            Some(existing) => *existing = todo,
            None => self.todos.push(todo),
        }
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TodoId) -> Result<&mut Todo> {
        self.todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Flips `done` and returns the new value.
    pub fn toggle(&mut self, id: TodoId) -> Result<bool> {
        let todo = self.get_mut(id)?;
        todo.done = !todo.done;
        debug!(id, done = todo.done, "toggled todo");
        Ok(todo.done)
    }

    pub fn set_done(&mut self, id: TodoId, done: bool) -> Result<()> {
        self.get_mut(id)?.done = done;
        Ok(())
    }

    pub fn set_interact(&mut self, id: TodoId, interact: Option<bool>) -> Result<()> {
        self.get_mut(id)?.interact = interact;
        Ok(())
    }

    pub fn remove(&mut self, id: TodoId) -> Result<Todo> {
        let index = self
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::NotFound(id))?;
        debug!(id, "removed todo");
        Ok(self.todos.remove(index))
    }

    pub fn incomplete(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|t| !t.done)
    }
}
