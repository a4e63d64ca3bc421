//! Defaults for `get_or_set`
//!
//! Either a ready value or a producer that is only run on a miss. Producers
//! are wrapped explicitly, sync or async, so nothing has to guess whether the
//! default is callable.

use std::fmt;
use std::future::Future;

use futures::future::{self, BoxFuture, FutureExt};

use crate::value::Value;

type Producer = Box<dyn FnOnce() -> BoxFuture<'static, Value> + Send>;

pub enum DefaultValue {
    Value(Value),
    Producer(Producer),
}

impl DefaultValue {
    pub fn value(value: impl Into<Value>) -> Self {
        DefaultValue::Value(value.into())
    }

    /// Wraps a synchronous producer.
    pub fn from_fn<F, V>(producer: F) -> Self
    where
        F: FnOnce() -> V + Send + 'static,
        V: Into<Value> + 'static,
    {
        DefaultValue::Producer(Box::new(move || {
            let value: Value = producer().into();
            future::ready(value).boxed()
        }))
    }

    /// Wraps an async producer; its future is awaited on a miss.
    pub fn from_async<F, Fut, V>(producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = V> + Send + 'static,
        V: Into<Value> + 'static,
    {
        DefaultValue::Producer(Box::new(move || producer().map(Into::<Value>::into).boxed()))
    }

    /// Produces the value, running the producer if there is one.
    pub async fn resolve(self) -> Value {
        match self {
            DefaultValue::Value(value) => value,
            DefaultValue::Producer(producer) => producer().await,
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Value(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(s: &str) -> Self {
        DefaultValue::Value(s.into())
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}
