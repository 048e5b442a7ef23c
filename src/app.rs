// app.rs
use crate::error::AppError;
use crate::todo::{Todo, TodoId, TodoList};
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Status,
    CreationDate,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Status, Field::CreationDate];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Status => "Status",
            Field::CreationDate => "Creation Date",
        }
    }
}

impl FromStr for Field {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "status" => Ok(Field::Status),
            "creationDate" => Ok(Field::CreationDate),
            other => Err(AppError::UnknownField(other.to_string())),
        }
    }
}

/// Whatever the user is currently typing. Shared by both modals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputValues {
    pub name: String,
    pub status: String,
    pub creation_date: String,
}

impl InputValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Status => &self.status,
            Field::CreationDate => &self.creation_date,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Status => self.status = value,
            Field::CreationDate => self.creation_date = value,
        }
    }

    pub fn clear(&mut self) {
        *self = InputValues::default();
    }
}

impl From<&Todo> for InputValues {
    fn from(todo: &Todo) -> Self {
        Self {
            name: todo.name.clone(),
            status: todo.status.clone(),
            creation_date: todo.creation_date.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    SetField(Field, String),
    OpenCreateModal,
    CloseCreateModal,
    ConfirmCreate,
    CancelCreate,
    OpenUpdateModal(TodoId),
    ConfirmUpdate,
    CancelUpdate,
    DeleteTodo(TodoId),
}

#[derive(Debug, Default)]
pub struct App {
    pub todos: TodoList,
    pub input: InputValues,
    pub selected: Option<TodoId>,
    pub create_modal_open: bool,
    pub update_modal_open: bool,
}

impl App {
    pub fn new() -> Self {
        App::default()
    }

    /// Applies one action. On error the state is left exactly as it was.
    pub fn dispatch(&mut self, action: Action) -> Result<(), AppError> {
        debug!(?action, "dispatch");
        match action {
            Action::SetField(field, value) => self.set_field(field, value),
            Action::OpenCreateModal => self.create_modal_open = true,
            Action::CloseCreateModal => self.create_modal_open = false,
            Action::ConfirmCreate => {
                self.create_todo();
                self.create_modal_open = false;
            }
            Action::CancelCreate => {
                self.input.clear();
                self.create_modal_open = false;
            }
            Action::OpenUpdateModal(id) => self.open_update_modal(id)?,
            Action::ConfirmUpdate => self.confirm_update()?,
            Action::CancelUpdate => self.close_update_modal(),
            Action::DeleteTodo(id) => self.delete_todo(id),
        }
        Ok(())
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        self.input.set(field, value);
    }

    pub fn create_todo(&mut self) -> TodoId {
        let input = std::mem::take(&mut self.input);
        let id = self
            .todos
            .insert(input.name, input.status, input.creation_date);
        info!(%id, "todo created");
        id
    }

    pub fn open_update_modal(&mut self, id: TodoId) -> Result<(), AppError> {
        let todo = self.todos.get(id).ok_or(AppError::TodoNotFound(id))?;
        self.input = InputValues::from(todo);
        self.selected = Some(id);
        self.update_modal_open = true;
        Ok(())
    }

    /// Overwrites the editable fields of `id` with the current input. An id
    /// with no matching record leaves the list alone.
    pub fn update_todo(&mut self, id: TodoId) {
        let input = std::mem::take(&mut self.input);
        match self.todos.get_mut(id) {
            Some(todo) => {
                todo.name = input.name;
                todo.status = input.status;
                todo.creation_date = input.creation_date;
                info!(%id, "todo updated");
            }
            None => warn!(%id, "update target no longer exists"),
        }
        self.selected = None;
        self.update_modal_open = false;
    }

    pub fn confirm_update(&mut self) -> Result<(), AppError> {
        let id = self.selected.ok_or(AppError::NoSelection)?;
        self.update_todo(id);
        Ok(())
    }

    pub fn close_update_modal(&mut self) {
        self.selected = None;
        self.input.clear();
        self.update_modal_open = false;
    }

    pub fn delete_todo(&mut self, id: TodoId) {
        if self.todos.remove(id) {
            info!(%id, "todo deleted");
        } else {
            debug!(%id, "delete of unknown todo ignored");
        }
    }
}
