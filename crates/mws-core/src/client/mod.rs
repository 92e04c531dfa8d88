//! Client facade.
//!
//! [`MwsClient`] owns the transport, the clock, the retry policy and one
//! throttle state per operation. Calls for the same operation queue on that
//! operation's lock for their whole duration; calls for different operations
//! run in parallel.

mod products;
mod reports;

use std::sync::{Arc, PoisonError};

use crate::clock::{Clock, SystemClock};
use crate::config::MwsConfig;
use crate::control::CancelToken;
use crate::error::MwsError;
use crate::operation::Operation;
use crate::parsers::Decode;
use crate::request::{CurlTransport, Fetch};
use crate::retry::{BatchOutcome, RetryController, RetryPolicy};
use crate::throttle::{ThrottleRegistry, ThrottleState};

pub struct MwsClient<F = CurlTransport, C = SystemClock> {
    fetch: F,
    clock: C,
    policy: RetryPolicy,
    marketplace_id: String,
    registry: ThrottleRegistry,
}

impl MwsClient<CurlTransport, SystemClock> {
    /// Build a client that signs with the config's credentials and sends over curl.
    pub fn from_config(cfg: &MwsConfig) -> Result<Self, MwsError> {
        let credentials = cfg.credentials.clone().ok_or_else(|| {
            MwsError::InvalidInput("config has no [credentials] section".into())
        })?;
        let policy = match &cfg.retry {
            Some(retry) => RetryPolicy::from_config(retry)?,
            None => RetryPolicy::default(),
        };
        let marketplace_id = credentials.marketplace_id.clone();
        let fetch = CurlTransport::from_config(cfg, credentials)?;
        Ok(Self::with_parts(fetch, SystemClock, policy, marketplace_id))
    }
}

impl<F, C> MwsClient<F, C>
where
    F: Fetch,
    C: Clock,
{
    pub fn with_parts(
        fetch: F,
        clock: C,
        policy: RetryPolicy,
        marketplace_id: impl Into<String>,
    ) -> Self {
        Self {
            fetch,
            clock,
            policy,
            marketplace_id: marketplace_id.into(),
            registry: ThrottleRegistry::new(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn marketplace_id(&self) -> &str {
        &self.marketplace_id
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Copy of `op`'s throttle state, if it has been called.
    pub fn throttle_snapshot(&self, op: &Operation) -> Option<ThrottleState> {
        self.registry.snapshot(op.name)
    }

    /// Send `items` in chunks and return the decoded records in input order.
    pub fn submit_batch<T, D>(&self, op: &Operation, items: &[T], decoder: &D) -> Result<Vec<D::Record>, MwsError>
    where
        T: AsRef<str>,
        D: Decode + ?Sized,
    {
        self.submit_batch_with_cancel(op, items, &[], decoder, &CancelToken::new())
            .map(|outcome| outcome.records)
    }

    /// Like [`submit_batch`](Self::submit_batch) with extra per-request
    /// parameters and a cancellation token; also returns the call summary.
    pub fn submit_batch_with_cancel<T, D>(
        &self,
        op: &Operation,
        items: &[T],
        extra_params: &[(String, String)],
        decoder: &D,
        cancel: &CancelToken,
    ) -> Result<BatchOutcome<D::Record>, MwsError>
    where
        T: AsRef<str>,
        D: Decode + ?Sized,
    {
        let params = self.base_params(extra_params);
        self.with_state(op, |state| {
            RetryController::new(op, &self.policy, &self.fetch, &self.clock, cancel)
                .run(state, items, &params, decoder)
        })
    }

    /// One request with `params` and no item list.
    pub fn call<D>(
        &self,
        op: &Operation,
        params: &[(String, String)],
        decoder: &D,
        cancel: &CancelToken,
    ) -> Result<BatchOutcome<D::Record>, MwsError>
    where
        D: Decode + ?Sized,
    {
        let params = self.base_params(params);
        self.with_state(op, |state| {
            RetryController::new(op, &self.policy, &self.fetch, &self.clock, cancel)
                .run_single(state, &params, decoder)
        })
    }

    fn base_params(&self, extra: &[(String, String)]) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(extra.len() + 1);
        params.push(("MarketplaceId".to_string(), self.marketplace_id.clone()));
        params.extend_from_slice(extra);
        params
    }

    fn with_state<R>(&self, op: &Operation, f: impl FnOnce(&mut ThrottleState) -> R) -> R {
        let shared = self.registry.state_for(op.name);
        let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl<F, C> MwsClient<F, C>
where
    F: Fetch + 'static,
    C: Clock + 'static,
{
    /// Run [`submit_batch`](Self::submit_batch) on tokio's blocking pool.
    pub async fn submit_batch_async<D>(
        self: Arc<Self>,
        op: &'static Operation,
        items: Vec<String>,
        decoder: D,
    ) -> Result<Vec<D::Record>, MwsError>
    where
        D: Decode + Send + 'static,
        D::Record: Send + 'static,
    {
        tokio::task::spawn_blocking(move || self.submit_batch(op, &items, &decoder))
            .await
            .map_err(|e| MwsError::TaskFailed(e.to_string()))?
    }
}
