//! Request lifecycle: the status machine shared by every feature slice.
//!
//! Each remote operation produces up to two lifecycle events: `Pending` when
//! it starts, then `Fulfilled(payload)` or `Rejected(error)` when it settles.
//! A feature carries its events in one action variant
//! (`AdminAction::Request(RequestEvent<AdminOp, AdminPayload>)`), so "every
//! pending action of the admin feature" is a typed match instead of a string
//! prefix test.
//!
//! ```text
//!            Pending (Global)           Fulfilled
//!   Idle ───────────────────▶ Loading ────────────▶ Succeeded
//!     ▲                          │
//!     │ reset                    │ Rejected
//!     │                          ▼
//!     └──────────────────────  Failed
//! ```
//!
//! Events tagged [`Origin::Local`] are background work (comment polling, or
//! a failure that was already handled elsewhere). A local `Pending` leaves
//! the status alone so loading indicators do not flicker.

use crate::effect::Effect;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Status of the most recent request in a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing requested yet, or reset
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request settled successfully
    Succeeded,
    /// The last request failed
    Failed,
}

/// Whether an event should drive global, user-visible request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Origin {
    /// Normal user-initiated request
    #[default]
    Global,
    /// Background or already-handled request
    Local,
}

/// Phase of a request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The request started
    Pending,
    /// The request succeeded with a payload
    Fulfilled(T),
    /// The request failed
    Rejected(ApiError),
}

/// A lifecycle event for one operation of one feature
///
/// # Type Parameters
///
/// - `Op`: the feature's operation enum (what was requested)
/// - `T`: the feature's payload type
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEvent<Op, T> {
    /// The operation this event belongs to
    pub op: Op,
    /// Global or local
    pub origin: Origin,
    /// Pending, fulfilled or rejected
    pub outcome: Outcome<T>,
}

impl<Op, T> RequestEvent<Op, T> {
    /// A global pending event
    #[must_use]
    pub const fn pending(op: Op) -> Self {
        Self {
            op,
            origin: Origin::Global,
            outcome: Outcome::Pending,
        }
    }

    /// A global fulfilled event
    #[must_use]
    pub const fn fulfilled(op: Op, payload: T) -> Self {
        Self {
            op,
            origin: Origin::Global,
            outcome: Outcome::Fulfilled(payload),
        }
    }

    /// A global rejected event
    #[must_use]
    pub const fn rejected(op: Op, error: ApiError) -> Self {
        Self {
            op,
            origin: Origin::Global,
            outcome: Outcome::Rejected(error),
        }
    }

    /// Re-tag the event as local
    #[must_use]
    pub fn local(mut self) -> Self {
        self.origin = Origin::Local;
        self
    }

    /// True if tagged local
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.origin == Origin::Local
    }

    /// True once the request has fulfilled or rejected
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self.outcome, Outcome::Pending)
    }

    /// The error of a rejected event
    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        match &self.outcome {
            Outcome::Rejected(error) => Some(error),
            Outcome::Pending | Outcome::Fulfilled(_) => None,
        }
    }
}

/// Actions that may carry a request lifecycle event
///
/// Lets cross-cutting listeners inspect rejections of any feature without
/// knowing the feature's payload types.
pub trait Lifecycle: Sized {
    /// The error, if this action is a rejected lifecycle event
    fn rejection(&self) -> Option<&ApiError>;

    /// The origin, if this action is a lifecycle event
    fn origin(&self) -> Option<Origin>;

    /// The same action re-tagged as local (non-lifecycle actions unchanged)
    #[must_use]
    fn into_local(self) -> Self;
}

impl<Op, T> Lifecycle for RequestEvent<Op, T> {
    fn rejection(&self) -> Option<&ApiError> {
        self.error()
    }

    fn origin(&self) -> Option<Origin> {
        Some(self.origin)
    }

    fn into_local(self) -> Self {
        self.local()
    }
}

/// Request status plus data for one feature
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AsyncSlice<D> {
    /// The feature's data
    pub data: D,
    /// Status of the latest request
    pub status: RequestStatus,
    /// Error of the latest failed request, cleared when a new one starts
    pub error: Option<ApiError>,
}

impl<D> AsyncSlice<D> {
    /// An idle slice holding `data`
    #[must_use]
    pub const fn new(data: D) -> Self {
        Self {
            data,
            status: RequestStatus::Idle,
            error: None,
        }
    }

    /// Apply the generic pending/fulfilled/rejected matcher
    ///
    /// Payload merging is per operation and stays in the feature reducer;
    /// this only moves `status` and `error`.
    pub fn track<Op, T>(&mut self, event: &RequestEvent<Op, T>) {
        match &event.outcome {
            Outcome::Pending => {
                if event.origin == Origin::Global {
                    self.status = RequestStatus::Loading;
                    self.error = None;
                }
            },
            Outcome::Fulfilled(_) => {
                self.status = RequestStatus::Succeeded;
            },
            Outcome::Rejected(error) => {
                self.status = RequestStatus::Failed;
                self.error = Some(error.clone());
            },
        }
    }

    /// True while a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }
}

/// Build the effect that performs one request and reports how it settled
///
/// The future is the remote call; its result is wrapped into a fulfilled or
/// rejected [`RequestEvent`] and lifted into the feature action by `wrap`.
/// The matching pending event is applied by the reducer before it returns
/// this effect.
pub fn perform<Op, T, A, F>(
    op: Op,
    origin: Origin,
    call: F,
    wrap: fn(RequestEvent<Op, T>) -> A,
) -> Effect<A>
where
    Op: Send + 'static,
    T: Send + 'static,
    A: Send + 'static,
    F: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    Effect::Future(Box::pin(async move {
        let outcome = match call.await {
            Ok(payload) => Outcome::Fulfilled(payload),
            Err(error) => Outcome::Rejected(error),
        };
        Some(wrap(RequestEvent {
            op,
            origin,
            outcome,
        }))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Load,
    }

    #[test]
    fn pending_clears_error_and_loads() {
        let mut slice = AsyncSlice::new(0_u32);
        slice.track(&RequestEvent::<Op, u32>::rejected(Op::Load, ApiError::new("boom", 500)));
        assert_eq!(slice.status, RequestStatus::Failed);

        slice.track(&RequestEvent::<Op, u32>::pending(Op::Load));
        assert_eq!(slice.status, RequestStatus::Loading);
        assert!(slice.error.is_none());
    }

    #[test]
    fn local_pending_keeps_status() {
        let mut slice = AsyncSlice::new(0_u32);
        slice.track(&RequestEvent::<Op, u32>::fulfilled(Op::Load, 3));
        slice.track(&RequestEvent::<Op, u32>::pending(Op::Load).local());
        assert_eq!(slice.status, RequestStatus::Succeeded);
    }

    #[test]
    fn local_rejection_still_fails() {
        let mut slice = AsyncSlice::new(0_u32);
        let event = RequestEvent::<Op, u32>::rejected(Op::Load, ApiError::new("expired", 401)).local();
        slice.track(&event);
        assert_eq!(slice.status, RequestStatus::Failed);
        assert_eq!(slice.error.as_ref().map(|e| e.status), Some(401));
    }

    #[test]
    fn lifecycle_reports_rejection_and_origin() {
        let event = RequestEvent::<Op, u32>::rejected(Op::Load, ApiError::new("expired", 401));
        assert_eq!(event.rejection().map(|e| e.status), Some(401));
        assert_eq!(Lifecycle::origin(&event), Some(Origin::Global));
        assert!(event.into_local().is_local());
    }

    #[tokio::test]
    async fn perform_wraps_outcome() {
        let effect = perform(Op::Load, Origin::Global, async { Ok::<_, ApiError>(7_u32) }, |e| e);
        let Effect::Future(future) = effect else {
            unreachable!("perform produces a future effect");
        };
        let event = future.await;
        assert_eq!(event, Some(RequestEvent::fulfilled(Op::Load, 7)));
    }
}
