//! In-memory [`GraphQLTransport`] for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use graphql_client::GraphQLQuery;
use serde_json::Value;

use crate::shopify::AdminShopifyError;

use super::GraphQLTransport;

/// A scripted reply for one request.
pub enum Reply {
    /// Deserialize this value as the operation's `data`.
    Data(Value),
    /// Fail the request.
    Error(AdminShopifyError),
    /// Never answer (for cancellation tests).
    Hang,
}

/// Records every request body and answers from a queue of replies.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Value>>,
    calls: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `data` payload.
    pub fn reply(self, data: Value) -> Self {
        self.push(Reply::Data(data))
    }

    /// Queue a failure.
    pub fn fail(self, err: AdminShopifyError) -> Self {
        self.push(Reply::Error(err))
    }

    /// Queue a request that never completes.
    pub fn hang(self) -> Self {
        self.push(Reply::Hang)
    }

    fn push(self, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Serialized request bodies (`query`, `variables`, `operationName`).
    pub fn requests(&self) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Variables of the most recent request.
    pub fn last_variables(&self) -> Value {
        self.requests()
            .last()
            .map(|body| body["variables"].clone())
            .unwrap_or(Value::Null)
    }
}

impl GraphQLTransport for FakeTransport {
    async fn execute<Q>(&self, variables: Q::Variables) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q: GraphQLQuery,
        Q::Variables: Send,
        Q::ResponseData: Send,
    {
        let body = serde_json::to_value(Q::build_query(variables))?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(body);

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();

        match reply {
            Some(Reply::Data(data)) => Ok(serde_json::from_value(data)?),
            Some(Reply::Error(err)) => Err(err),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(AdminShopifyError::InvalidData(
                "no scripted reply".to_string(),
            )),
        }
    }
}
