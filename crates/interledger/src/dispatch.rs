//! Invocation surface.
//!
//! A ledger platform hands a contract a function name and a list of string
//! arguments. This module parses that into a closed set of typed requests,
//! runs the matching operation, and folds every outcome into a [`Response`].
//! No error crosses this boundary.
//!
//! | Role     | Function             | Arguments            |
//! |----------|----------------------|----------------------|
//! | Sender   | `emitData`           | payload              |
//! | Sender   | `interledgerCommit`  | identity             |
//! | Sender   | `interledgerAbort`   | identity, reason     |
//! | Receiver | `interledgerReceive` | identity, payload    |

use async_trait::async_trait;
use bytes::Bytes;

use interledger_bus::NotificationBus;
use interledger_core::{ErrorCode, Payload, TransferId};
use interledger_store::Store;

use crate::acceptance::AcceptancePolicy;
use crate::config::UnknownOperationPolicy;
use crate::error::{LedgerError, Result};
use crate::receiver::Receiver;
use crate::resolution::{Outcome, ResolutionHook};
use crate::sender::Sender;

pub const EMIT_DATA: &str = "emitData";
pub const INTERLEDGER_COMMIT: &str = "interledgerCommit";
pub const INTERLEDGER_ABORT: &str = "interledgerAbort";
pub const INTERLEDGER_RECEIVE: &str = "interledgerReceive";

/// Success marker returned by every dispatched operation.
pub const OK: &[u8] = b"OK";

/// A raw platform invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub function: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, A>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn expect_args(&self, count: usize) -> Result<()> {
        if self.args.len() == count {
            Ok(())
        } else {
            Err(self.invalid(format!(
                "expected {count} argument(s), got {}",
                self.args.len()
            )))
        }
    }

    fn identity(&self, index: usize) -> Result<TransferId> {
        self.args[index]
            .parse()
            .map_err(|e: interledger_core::CoreError| self.invalid(e.to_string()))
    }

    fn reason(&self, index: usize) -> Result<ErrorCode> {
        self.args[index]
            .parse()
            .map_err(|e: interledger_core::CoreError| self.invalid(e.to_string()))
    }

    fn invalid(&self, reason: String) -> LedgerError {
        LedgerError::InvalidArguments {
            function: self.function.clone(),
            reason,
        }
    }
}

/// Requests understood by the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderRequest {
    EmitData { payload: Payload },
    Commit { id: TransferId },
    Abort { id: TransferId, reason: ErrorCode },
}

impl SenderRequest {
    /// Parse an invocation. `Ok(None)` if the function is not a sender operation.
    pub fn parse(invocation: &Invocation) -> Result<Option<Self>> {
        let request = match invocation.function.as_str() {
            EMIT_DATA => {
                invocation.expect_args(1)?;
                SenderRequest::EmitData {
                    payload: Payload::new(invocation.args[0].clone()),
                }
            }
            INTERLEDGER_COMMIT => {
                invocation.expect_args(1)?;
                SenderRequest::Commit {
                    id: invocation.identity(0)?,
                }
            }
            INTERLEDGER_ABORT => {
                invocation.expect_args(2)?;
                SenderRequest::Abort {
                    id: invocation.identity(0)?,
                    reason: invocation.reason(1)?,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(request))
    }
}

/// Requests understood by the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverRequest {
    Receive { id: TransferId, payload: Payload },
}

impl ReceiverRequest {
    /// Parse an invocation. `Ok(None)` if the function is not a receiver operation.
    pub fn parse(invocation: &Invocation) -> Result<Option<Self>> {
        match invocation.function.as_str() {
            INTERLEDGER_RECEIVE => {
                invocation.expect_args(2)?;
                Ok(Some(ReceiverRequest::Receive {
                    id: invocation.identity(0)?,
                    payload: Payload::new(invocation.args[1].clone()),
                }))
            }
            _ => Ok(None),
        }
    }
}

/// Result of an invocation as seen by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success(Option<Bytes>),
    Failure { message: String },
}

impl Response {
    /// Success carrying the `OK` marker.
    pub fn ok() -> Self {
        Response::Success(Some(Bytes::from_static(OK)))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            Response::Success(payload) => payload.as_ref(),
            Response::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Response::Success(_) => None,
            Response::Failure { message } => Some(message),
        }
    }
}

impl From<LedgerError> for Response {
    fn from(e: LedgerError) -> Self {
        Response::Failure {
            message: e.to_string(),
        }
    }
}

fn respond(function: &str, result: Result<Option<Bytes>>) -> Response {
    match result {
        Ok(payload) => Response::Success(payload),
        Err(e) => {
            tracing::warn!(function, error = %e, "invocation failed");
            e.into()
        }
    }
}

fn unknown(function: &str, policy: UnknownOperationPolicy) -> Result<Option<Bytes>> {
    match policy {
        UnknownOperationPolicy::Ignore => {
            tracing::debug!(function, "ignoring unknown operation");
            Ok(Some(Bytes::from_static(OK)))
        }
        UnknownOperationPolicy::Reject => Err(LedgerError::UnknownOperation(function.to_string())),
    }
}

/// Platform entry points of a role.
#[async_trait]
pub trait Contract: Send + Sync {
    /// Instantiation / upgrade entry point.
    async fn init(&self, args: &[String]) -> Response;

    /// Per-transaction entry point.
    async fn invoke(&self, invocation: &Invocation) -> Response;
}

#[async_trait]
impl<S, B, H> Contract for Sender<S, B, H>
where
    S: Store,
    B: NotificationBus,
    H: ResolutionHook,
{
    async fn init(&self, args: &[String]) -> Response {
        respond("init", self.initialize(args).await.map(|()| None))
    }

    async fn invoke(&self, invocation: &Invocation) -> Response {
        let result: Result<Option<Bytes>> = async {
            let Some(request) = SenderRequest::parse(invocation)? else {
                return unknown(&invocation.function, self.config().unknown_operations);
            };
            match request {
                SenderRequest::EmitData { payload } => {
                    self.emit(payload).await?;
                }
                SenderRequest::Commit { id } => {
                    self.resolve(id, Outcome::Commit).await?;
                }
                SenderRequest::Abort { id, reason } => {
                    self.resolve(id, Outcome::Abort { reason }).await?;
                }
            }
            Ok(Some(Bytes::from_static(OK)))
        }
        .await;
        respond(&invocation.function, result)
    }
}

#[async_trait]
impl<S, B, P> Contract for Receiver<S, B, P>
where
    S: Store,
    B: NotificationBus,
    P: AcceptancePolicy,
{
    async fn init(&self, args: &[String]) -> Response {
        respond("init", self.initialize(args).await.map(|()| None))
    }

    async fn invoke(&self, invocation: &Invocation) -> Response {
        let result: Result<Option<Bytes>> = async {
            let Some(request) = ReceiverRequest::parse(invocation)? else {
                return unknown(&invocation.function, self.config().unknown_operations);
            };
            match request {
                ReceiverRequest::Receive { id, payload } => {
                    self.receive(id, payload).await?;
                }
            }
            Ok(Some(Bytes::from_static(OK)))
        }
        .await;
        respond(&invocation.function, result)
    }
}
