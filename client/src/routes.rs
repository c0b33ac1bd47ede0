//! Application routes and the session guard.

use crate::features::auth::{self, AuthState};
use std::fmt;
use url::form_urlencoded;

/// Every page of the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/admin`
    Admin,
    /// `/my-collections`
    MyCollections,
    /// `/my-collections/create`
    CreateCollection,
    /// `/my-collections/{id}/edit`
    EditCollection(i64),
    /// `/collections/{id}`
    Collection(i64),
    /// `/items/{id}`
    Item(i64),
    /// `/collections/{id}/items/create`
    CreateItem {
        /// Owning collection
        collection_id: i64,
    },
    /// `/collections/{id}/items/{itemId}/edit`
    EditItem {
        /// Owning collection
        collection_id: i64,
        /// Edited item
        item_id: i64,
    },
    /// `/search?searchString=...`
    Search(String),
}

impl Route {
    /// Path of the route, with its query when it has one
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::MyCollections => "/my-collections".to_string(),
            Self::CreateCollection => "/my-collections/create".to_string(),
            Self::EditCollection(id) => format!("/my-collections/{id}/edit"),
            Self::Collection(id) => format!("/collections/{id}"),
            Self::Item(id) => format!("/items/{id}"),
            Self::CreateItem { collection_id } => format!("/collections/{collection_id}/items/create"),
            Self::EditItem {
                collection_id,
                item_id,
            } => format!("/collections/{collection_id}/items/{item_id}/edit"),
            Self::Search(text) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("searchString", text)
                    .finish();
                format!("/search?{query}")
            },
        }
    }

    /// Route for `path`, ignoring any query except the search string
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        fn id(segment: &str) -> Option<i64> {
            segment.parse().ok()
        }

        let route = match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["admin"] => Self::Admin,
            ["my-collections"] => Self::MyCollections,
            ["my-collections", "create"] => Self::CreateCollection,
            ["my-collections", collection, "edit"] => Self::EditCollection(id(collection)?),
            ["collections", collection] => Self::Collection(id(collection)?),
            ["collections", collection, "items", "create"] => Self::CreateItem {
                collection_id: id(collection)?,
            },
            ["collections", collection, "items", item, "edit"] => Self::EditItem {
                collection_id: id(collection)?,
                item_id: id(item)?,
            },
            ["items", item] => Self::Item(id(item)?),
            ["search"] => Self::Search(
                form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == "searchString")
                    .map(|(_, value)| value.into_owned())
                    .unwrap_or_default(),
            ),
            _ => return None,
        };
        Some(route)
    }

    /// True for pages that only make sense with a session
    #[must_use]
    pub const fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::Admin
                | Self::MyCollections
                | Self::CreateCollection
                | Self::EditCollection(_)
                | Self::CreateItem { .. }
                | Self::EditItem { .. }
        )
    }

    /// Where to send the user instead, if anywhere
    ///
    /// Guarded pages redirect to [`Route::Login`] when nobody is signed in.
    #[must_use]
    pub fn guard(&self, auth: &AuthState) -> Option<Self> {
        (self.requires_session() && !auth::is_signed_in(auth)).then_some(Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
