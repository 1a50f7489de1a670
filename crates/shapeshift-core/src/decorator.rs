//! Run a function's result through a mapper
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use crate::mapper::{Mapper, Output, Target};
use crate::Result;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// Future returned by functions decorated with [`decorate_async`]
pub type MappedFuture<T> = Pin<Box<dyn Future<Output = Result<Output<T>>> + Send>>;

/// Wrap `f` so that its return value is mapped by `mapper`
pub fn decorate<T, A, F>(mapper: Mapper<T>, f: F) -> impl Fn(A) -> Result<Output<T>>
where
    T: Target,
    F: Fn(A) -> Value,
{
    move |args| mapper.map(&f(args))
}

/// Wrap an async `f` so that its resolved value is mapped by `mapper`
pub fn decorate_async<T, A, F, Fut>(mapper: Mapper<T>, f: F) -> impl Fn(A) -> MappedFuture<T>
where
    T: Target + 'static,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Value> + Send + 'static,
{
    move |args| {
        let mapper = mapper.clone();
        let pending = f(args);
        Box::pin(async move { mapper.map(&pending.await) })
    }
}
