//! Session access for tasks.
//!
//! The [`Session`] trait is the dispatcher's window onto the outside
//! world: the proof-checker process and the view panel. The editor
//! integration supplies the implementation; the dispatcher and the
//! `WithState` task callbacks consume it.
//!
//! # Subscription Model
//!
//! A proof-checker request yields a [`ResponseStream`]: a bounded channel
//! receiver carrying [`StreamEvent`]s. The receiver IS the subscription
//! handle: the request bridge owns it for the lifetime of one request,
//! and dropping it releases the subscription. This replaces manual
//! subscribe/unsubscribe bookkeeping with scoped acquisition: the handle
//! cannot leak past the bridge that holds it, on the happy path or on
//! error paths.

use crate::{AgdaRequest, CoreError, StreamEvent, ViewRequest, ViewResponse};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Stream of events produced by one proof-checker request.
///
/// Ends with [`StreamEvent::Stop`]; the sender side may also simply be
/// dropped, which consumers treat the same way.
pub type ResponseStream = mpsc::Receiver<StreamEvent>;

/// Access to the proof checker and the view panel.
///
/// Implementations are supplied by the editor integration. All methods
/// take `&self`: a session is shared behind an `Arc` between the
/// dispatcher, the request bridge, and state callbacks, and is expected
/// to manage its own interior state.
///
/// # Contract
///
/// - [`send_agda_request`](Self::send_agda_request) issues one request and
///   returns its response stream, or a [`CoreError::Connection`] if the
///   process cannot be reached. The caller serializes requests; the
///   session will never see two in flight.
/// - [`send_view_request`](Self::send_view_request) resolves when the view
///   has handled the request; for prompting requests, when the user has
///   answered.
/// - [`destroy`](Self::destroy) tears the session down. The dispatcher
///   guarantees at most one call.
#[async_trait]
pub trait Session: Send + Sync {
    /// Issues one request to the proof checker.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Connection`] when the checker process cannot
    /// be reached or refuses the connection.
    async fn send_agda_request(&self, request: AgdaRequest) -> Result<ResponseStream, CoreError>;

    /// Issues one request to the view panel and awaits its response.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Connection`] when the panel transport is gone.
    async fn send_view_request(&self, request: ViewRequest) -> Result<ViewResponse, CoreError>;

    /// Tears the session down, releasing the checker and the panel.
    async fn destroy(&self);
}
