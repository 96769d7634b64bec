use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{api::TodoApi, error::ApiError, todo::{TodoId, TodoItem, TodoPayload}};

pub fn id(n: i64) -> TodoId { TodoId::Number(n.into()) }

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(TodoPayload),
    Update(TodoId, TodoPayload),
    Delete(TodoId),
}

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Transport,
    Status(u16),
    Malformed,
}

impl Failure {
    fn to_error(self) -> ApiError {
        match self {
            Failure::Transport => ApiError::Transport("connection refused".into()),
            Failure::Status(status) => ApiError::Status { status, body: String::new() },
            Failure::Malformed => ApiError::Malformed("expected a sequence of todos".into()),
        }
    }
}

#[derive(Default)]
struct State {
    items: Vec<TodoItem>,
    next_id: i64,
    calls: Vec<Call>,
    failure: Option<Failure>,
}

/// A `TodoApi` backed by a vector, recording every call.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryApi {
    pub fn with_items(items: Vec<TodoItem>) -> Self {
        let next_id = items.iter().filter_map(|t| match &t.id { TodoId::Number(n) => n.as_i64(), TodoId::Text(_) => None }).max().unwrap_or(0) + 1;
        Self { state: Arc::new(Mutex::new(State { items, next_id, ..Default::default() })) }
    }

    pub fn fail_with(&self, failure: Option<Failure>) { self.state.lock().unwrap().failure = failure; }
    pub fn calls(&self) -> Vec<Call> { self.state.lock().unwrap().calls.clone() }
    pub fn stored(&self) -> Vec<TodoItem> { self.state.lock().unwrap().items.clone() }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failure {
            Some(f) => Err(f.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TodoApi for InMemoryApi {
    async fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        self.record(Call::List)?;
        Ok(self.stored())
    }

    async fn create(&self, input: TodoPayload) -> Result<TodoItem, ApiError> {
        self.record(Call::Create(input.clone()))?;
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(1);
        let item = TodoItem::new(id(state.next_id), input.title, input.description, input.completed);
        state.next_id += 1;
        state.items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: TodoId, input: TodoPayload) -> Result<TodoItem, ApiError> {
        self.record(Call::Update(id.clone(), input.clone()))?;
        let mut state = self.state.lock().unwrap();
        let Some(todo) = state.items.iter_mut().find(|t| t.id == id) else {
            return Err(Failure::Status(404).to_error());
        };
        todo.title = input.title;
        todo.description = input.description;
        todo.completed = input.completed;
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        self.record(Call::Delete(id.clone()))?;
        let mut state = self.state.lock().unwrap();
        let before = state.items.len();
        state.items.retain(|t| t.id != id);
        if state.items.len() == before { return Err(Failure::Status(404).to_error()); }
        Ok(())
    }
}
