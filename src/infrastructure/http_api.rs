use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{
    api::TodoApi,
    error::ApiError,
    todo::{TodoId, TodoItem, TodoPayload},
};

/// `TodoApi` over HTTP/JSON against `{base_url}/todos`.
#[derive(Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: Url,
    todos_url: Url,
}

impl HttpTodoApi {
    /// `timeout` of `None` lets requests wait indefinitely.
    pub fn connect(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let mut todos_url = base_url.clone();
        todos_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url {base_url} cannot carry a path"))?
            .pop_if_empty()
            .push("todos");
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()?, base_url, todos_url })
    }

    pub fn base_url(&self) -> &Url { &self.base_url }

    fn todo_url(&self, id: &TodoId) -> Url {
        let mut url = self.todos_url.clone();
        // todos_url already took a path segment in `connect`, so this cannot fail
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        let response = self.client.get(self.todos_url.clone()).send().await.map_err(transport)?;
        let body = success_body(response).await?;
        let value: Value = serde_json::from_str(&body).map_err(malformed)?;
        if !value.is_array() {
            return Err(ApiError::Malformed(format!("expected a sequence of todos, got {}", kind(&value))));
        }
        serde_json::from_value(value).map_err(malformed)
    }

    async fn create(&self, input: TodoPayload) -> Result<TodoItem, ApiError> {
        let response = self.client.post(self.todos_url.clone()).json(&input).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn update(&self, id: TodoId, input: TodoPayload) -> Result<TodoItem, ApiError> {
        let response = self.client.put(self.todo_url(&id)).json(&input).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.client.delete(self.todo_url(&id)).send().await.map_err(transport)?;
        success_body(response).await.map(|_| ())
    }
}

/// Reads the body of a 2xx response; anything else becomes `ApiError::Status`.
async fn success_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(ApiError::Status { status: status.as_u16(), body });
    }
    Ok(body)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = success_body(response).await?;
    serde_json::from_str(&body).map_err(malformed)
}

fn transport(e: reqwest::Error) -> ApiError { ApiError::Transport(e.to_string()) }

fn malformed(e: serde_json::Error) -> ApiError { ApiError::Malformed(e.to_string()) }

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection_and_item_urls() {
        let api = HttpTodoApi::connect("http://localhost:3000", None).unwrap();
        assert_eq!(api.todos_url.as_str(), "http://localhost:3000/todos");
        assert_eq!(api.todo_url(&TodoId::Number(1i64.into())).as_str(), "http://localhost:3000/todos/1");
    }

    #[test]
    fn keeps_base_path_and_tolerates_trailing_slash() {
        let api = HttpTodoApi::connect("http://example.com/api/", None).unwrap();
        assert_eq!(api.todos_url.as_str(), "http://example.com/api/todos");
        let id = TodoId::Text("a b/c".into());
        assert_eq!(api.todo_url(&id).as_str(), "http://example.com/api/todos/a%20b%2Fc");
    }

    #[test]
    fn large_and_fractional_numeric_ids_are_written_verbatim() {
        let api = HttpTodoApi::connect("http://localhost:3000", None).unwrap();
        let big: TodoId = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(api.todo_url(&big).as_str(), "http://localhost:3000/todos/18446744073709551615");
        let frac: TodoId = serde_json::from_str("1.5").unwrap();
        assert_eq!(api.todo_url(&frac).as_str(), "http://localhost:3000/todos/1.5");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(HttpTodoApi::connect("not a url", None).is_err());
        let err = HttpTodoApi::connect("mailto:someone@example.com", None).err().unwrap();
        assert!(err.to_string().contains("cannot carry a path"));
    }
}
