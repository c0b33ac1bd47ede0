//! Feature slices.
//!
//! Each feature owns one field of [`AppState`](crate::app::AppState) and
//! has its own action enum, reducer and selectors. Remote operations follow
//! one shape: the intent action marks the slice as loading and returns a
//! [`perform`](catalog_core::perform) effect; the effect feeds back a
//! `Request(RequestEvent<Op, Payload>)` action that settles the slice and
//! merges the payload.

/// Implement [`Lifecycle`](catalog_core::Lifecycle) for a feature action
/// whose lifecycle events live in a `Request` variant
macro_rules! request_lifecycle {
    ($action:ty) => {
        impl catalog_core::Lifecycle for $action {
            fn rejection(&self) -> Option<&catalog_core::ApiError> {
                match self {
                    Self::Request(event) => event.error(),
                    _ => None,
                }
            }

            fn origin(&self) -> Option<catalog_core::Origin> {
                match self {
                    Self::Request(event) => Some(event.origin),
                    _ => None,
                }
            }

            fn into_local(self) -> Self {
                match self {
                    Self::Request(event) => Self::Request(event.local()),
                    other => other,
                }
            }
        }
    };
}

pub mod admin;
pub mod auth;
pub mod collection;
pub mod collection_items;
pub mod collections;
pub mod home;
pub mod item;
pub mod items;
pub mod preferences;
pub mod search;
