use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;
use validator::Validate;

use crate::errors::{Failure, TypeMismatch};

/// Raw query parameters as received, before any type coercion
#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self(params)
    }

    /// Build from decoded pairs in query order; a repeated key keeps its first value
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = HashMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            params.entry(key).or_insert(value);
        }
        Self(params)
    }

    /// Coerce a single parameter. Absent and empty values bind as `None`.
    pub fn get<T: FromStr>(&self, name: &str) -> Result<Option<T>, TypeMismatch> {
        match self.0.get(name).map(String::as_str) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                TypeMismatch::new(Some(raw.to_string()), TypeMismatch::type_label::<T>())
            }),
        }
    }
}

/// Types that can be bound from raw query parameters
pub trait FromQueryParams: Sized {
    fn from_query_params(params: &QueryParams) -> Result<Self, TypeMismatch>;
}

/// Query extractor that binds, then validates.
///
/// Coercion failures reject with `InvalidParameterType`, constraint failures
/// with `InvalidParameters`. The rejection is a `Failure`, so it flows through
/// the problem middleware like any handler error.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: FromQueryParams + Validate,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Form decoding: `+` becomes a space. Decoding is lossy, so this
        // rejection does not fire for any query string seen over HTTP.
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!("Unreadable query string: {}", rejection.body_text());
                Failure::InvalidParameterType { mismatch: None }
            })?;

        let params = T::from_query_params(&QueryParams::from_pairs(pairs))?;
        params.validate()?;

        Ok(Self(params))
    }
}
