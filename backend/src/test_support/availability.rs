//! In-process availability doubles for service and endpoint tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::ports::{
    AvailabilitySourceError, LookupResponse, UsernameLookupSource, UsernameValidationSource,
    ValidationResponse,
};
use crate::domain::{AvailabilityResolver, AvailabilityStatus, AvailabilityVerdict, Username};

/// One observed resolver invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverCall {
    pub username: String,
    pub at: DateTime<Utc>,
}

/// Resolver answering from a script and recording when it was asked.
///
/// Names without a scripted status resolve as available.
pub struct ScriptedResolver {
    clock: Arc<dyn Clock>,
    statuses: HashMap<String, AvailabilityStatus>,
    panics_on: HashSet<String>,
    calls: Mutex<Vec<ResolverCall>>,
}

impl ScriptedResolver {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            statuses: HashMap::new(),
            panics_on: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_status(mut self, username: &str, status: AvailabilityStatus) -> Self {
        self.statuses.insert(username.to_owned(), status);
        self
    }

    #[must_use]
    pub fn panicking_on(mut self, username: &str) -> Self {
        self.panics_on.insert(username.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<ResolverCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(_) => panic!("resolver calls mutex"),
        }
    }

    pub fn called_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.username).collect()
    }
}

#[async_trait]
impl AvailabilityResolver for ScriptedResolver {
    async fn resolve(&self, username: &Username) -> AvailabilityVerdict {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(ResolverCall {
                username: username.as_str().to_owned(),
                at: self.clock.utc(),
            }),
            Err(_) => panic!("resolver calls mutex"),
        }
        if self.panics_on.contains(username.as_str()) {
            panic!("scripted resolver failure for {username}");
        }
        let status = self
            .statuses
            .get(username.as_str())
            .copied()
            .unwrap_or(AvailabilityStatus::Available);
        AvailabilityVerdict::new(username.as_str(), status)
    }
}

/// Validation source returning the same result for every name.
pub struct StaticValidationSource(pub Result<ValidationResponse, AvailabilitySourceError>);

#[async_trait]
impl UsernameValidationSource for StaticValidationSource {
    async fn validate(
        &self,
        _username: &Username,
    ) -> Result<ValidationResponse, AvailabilitySourceError> {
        self.0.clone()
    }
}

/// Lookup source returning the same result for every name.
pub struct StaticLookupSource(pub Result<LookupResponse, AvailabilitySourceError>);

#[async_trait]
impl UsernameLookupSource for StaticLookupSource {
    async fn lookup(
        &self,
        _username: &Username,
    ) -> Result<LookupResponse, AvailabilitySourceError> {
        self.0.clone()
    }
}
