use std::sync::Arc;

use crate::domain::api::TodoApi;
use crate::domain::error::ApiError;
use crate::domain::todo::{TodoId, TodoItem, TodoPayload};

/// Unsaved form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
}

impl Draft {
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}

/// What `submit` does with the draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormMode {
    #[default]
    Create,
    Edit(TodoItem),
}

/// One call against the remote collection, captured with the local state it
/// was issued from so it can run detached from the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Load,
    Create(TodoPayload),
    SaveEdit { id: TodoId, input: TodoPayload },
    Toggle { id: TodoId, input: TodoPayload },
    Remove(TodoId),
}

impl Request {
    pub fn toggle(item: &TodoItem) -> Self {
        Request::Toggle { id: item.id.clone(), input: TodoPayload::toggled(item) }
    }

    pub async fn send<A: TodoApi>(self, api: &A) -> Outcome {
        match self {
            Request::Load => Outcome::Loaded(api.list().await),
            Request::Create(input) => Outcome::Created(api.create(input).await),
            Request::SaveEdit { id, input } => {
                let result = api.update(id.clone(), input).await;
                Outcome::EditSaved { id, result }
            }
            Request::Toggle { id, input } => {
                let result = api.update(id.clone(), input).await;
                Outcome::Toggled { id, result }
            }
            Request::Remove(id) => {
                let result = api.delete(id.clone()).await;
                Outcome::Removed { id, result }
            }
        }
    }
}

/// The answer to a `Request`, to be folded back with `TodoListView::apply`.
#[derive(Debug)]
pub enum Outcome {
    Loaded(Result<Vec<TodoItem>, ApiError>),
    Created(Result<TodoItem, ApiError>),
    EditSaved { id: TodoId, result: Result<TodoItem, ApiError> },
    Toggled { id: TodoId, result: Result<TodoItem, ApiError> },
    Removed { id: TodoId, result: Result<(), ApiError> },
}

/// Local state of the todo list plus the operations that keep it in sync
/// with the remote collection.
///
/// Every operation reconciles local state and logs a failure before
/// returning; the returned `Result` is informational only. Callers that must
/// not wait on the network build a `Request`, send it elsewhere, and hand
/// the `Outcome` to `apply`.
pub struct TodoListView<A: TodoApi> {
    api: Arc<A>,
    items: Vec<TodoItem>,
    draft: Draft,
    mode: FormMode,
}

impl<A: TodoApi> TodoListView<A> {
    pub fn new(api: A) -> Self {
        Self { api: Arc::new(api), items: Vec::new(), draft: Draft::default(), mode: FormMode::Create }
    }

    pub fn api(&self) -> Arc<A> { Arc::clone(&self.api) }
    pub fn items(&self) -> &[TodoItem] { &self.items }
    pub fn draft(&self) -> &Draft { &self.draft }
    pub fn draft_mut(&mut self) -> &mut Draft { &mut self.draft }
    pub fn mode(&self) -> &FormMode { &self.mode }
    pub fn is_editing(&self) -> bool { matches!(self.mode, FormMode::Edit(_)) }

    pub fn editing_item(&self) -> Option<&TodoItem> {
        match &self.mode {
            FormMode::Edit(item) => Some(item),
            FormMode::Create => None,
        }
    }

    /// Replaces the collection with the server's. Any failure leaves it empty.
    pub async fn load(&mut self) -> Result<(), ApiError> { self.run(Request::Load).await }

    /// Creates a new item, or saves the one being edited.
    pub async fn submit(&mut self) -> Result<(), ApiError> { self.run(self.submit_request()).await }

    pub async fn remove(&mut self, id: &TodoId) -> Result<(), ApiError> { self.run(Request::Remove(id.clone())).await }

    pub async fn toggle_complete(&mut self, item: &TodoItem) -> Result<(), ApiError> { self.run(Request::toggle(item)).await }

    /// The request `submit` would send for the current drafts and mode.
    pub fn submit_request(&self) -> Request {
        let Draft { title, description } = self.draft.clone();
        match &self.mode {
            FormMode::Create => Request::Create(TodoPayload { title, description, completed: false }),
            // Completion is not editable from the form; keep what the item had.
            FormMode::Edit(item) => Request::SaveEdit {
                id: item.id.clone(),
                input: TodoPayload { title, description, completed: item.completed },
            },
        }
    }

    pub fn begin_edit(&mut self, item: &TodoItem) {
        self.draft = Draft { title: item.title.clone(), description: item.description.clone() };
        self.mode = FormMode::Edit(item.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.draft.clear();
        self.mode = FormMode::Create;
    }

    async fn run(&mut self, request: Request) -> Result<(), ApiError> {
        let outcome = request.send(self.api.as_ref()).await;
        self.apply(outcome)
    }

    /// Folds a finished request into local state.
    ///
    /// Drafts are only cleared when the form is still in the mode the request
    /// came from, so typing done while a save was in flight is not lost.
    pub fn apply(&mut self, outcome: Outcome) -> Result<(), ApiError> {
        match outcome {
            Outcome::Loaded(Ok(items)) => {
                tracing::debug!(count = items.len(), "todos loaded");
                self.items = items;
                Ok(())
            }
            Outcome::Loaded(Err(e)) => {
                tracing::error!(error = %e, "error fetching todos");
                self.items = Vec::new();
                Err(e)
            }
            Outcome::Created(Ok(created)) => {
                tracing::info!(id = %created.id, "todo created");
                self.items = self.items.iter().cloned().chain(std::iter::once(created)).collect();
                if !self.is_editing() { self.draft.clear(); }
                Ok(())
            }
            Outcome::Created(Err(e)) => {
                tracing::error!(error = %e, "error adding todo");
                Err(e)
            }
            Outcome::EditSaved { id, result: Ok(updated) } => {
                tracing::info!(%id, "todo updated");
                self.replace(&id, updated);
                if self.editing_item().is_some_and(|t| t.id == id) { self.cancel_edit(); }
                Ok(())
            }
            Outcome::Toggled { id, result: Ok(updated) } => {
                tracing::info!(%id, completed = updated.completed, "todo updated");
                self.replace(&id, updated);
                Ok(())
            }
            Outcome::EditSaved { id, result: Err(e) } | Outcome::Toggled { id, result: Err(e) } => {
                tracing::error!(%id, error = %e, "error updating todo");
                Err(e)
            }
            Outcome::Removed { id, result: Ok(()) } => {
                tracing::info!(%id, "todo deleted");
                self.items = self.items.iter().filter(|t| t.id != id).cloned().collect();
                Ok(())
            }
            Outcome::Removed { id, result: Err(e) } => {
                tracing::error!(%id, error = %e, "error deleting todo");
                Err(e)
            }
        }
    }

    fn replace(&mut self, id: &TodoId, updated: TodoItem) {
        self.items = self
            .items
            .iter()
            .map(|t| if &t.id == id { updated.clone() } else { t.clone() })
            .collect();
    }
}
