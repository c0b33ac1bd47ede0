//! Request and response bodies of the catalog API.
//!
//! All bodies are camelCase JSON. Ids are server-assigned integers.

use serde::{Deserialize, Serialize};

// ============================================================================
// Users and authentication
// ============================================================================

/// Credentials for `POST /users/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Body of `POST /users/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Session issued by login and register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    /// Display name of the signed-in user
    pub name: String,
    /// Bearer token for authorised calls
    pub jwt_token: String,
}

/// One row of the admin user table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// User id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email
    pub email: String,
    /// `true` when the account is active (not blocked)
    pub status: bool,
    /// `true` for administrators
    pub admin: bool,
}

/// A page of users
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUsersResponse {
    /// Total number of users
    #[serde(default)]
    pub users_count: u64,
    /// Number of pages at the requested page size
    pub pages_count: u32,
    /// Users on this page
    pub users: Vec<UserData>,
}

/// Page selector shared by every paged listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub count: u32,
}

/// Bulk modification applied to selected users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserModification {
    /// Disable sign-in
    Block,
    /// Re-enable sign-in
    Unblock,
    /// Grant admin rights
    Promote,
    /// Revoke admin rights
    Demote,
}

impl UserModification {
    /// Path segment under `/users`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Unblock => "unblock",
            Self::Promote => "promote",
            Self::Demote => "demote",
        }
    }
}

// ============================================================================
// Collections and fields
// ============================================================================

/// Type of a user-defined collection field
///
/// Sent over the wire as its integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FieldType {
    /// Single-line text
    #[default]
    String,
    /// Multi-line text
    MultiLineString,
    /// Integer
    Int,
    /// Checkbox
    Bool,
    /// Calendar date
    DateTime,
}

impl FieldType {
    /// Every field type, in discriminant order
    pub const ALL: [Self; 5] = [
        Self::String,
        Self::MultiLineString,
        Self::Int,
        Self::Bool,
        Self::DateTime,
    ];
}

impl From<FieldType> for u8 {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::String => 0,
            FieldType::MultiLineString => 1,
            FieldType::Int => 2,
            FieldType::Bool => 3,
            FieldType::DateTime => 4,
        }
    }
}

impl TryFrom<u8> for FieldType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| format!("unknown field type {value}"))
    }
}

/// A field definition of a collection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldData {
    /// Field id, `0` for a field not yet saved
    pub id: i64,
    /// Field label
    pub name: String,
    /// Value type
    pub field_type: FieldType,
}

/// A field definition for a collection being created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFieldData {
    /// Field label
    pub name: String,
    /// Value type
    pub field_type: FieldType,
}

/// A collection with its field definitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionData {
    /// Collection id
    pub id: i64,
    /// Name
    pub name: String,
    /// Markdown description
    pub description: String,
    /// Topic id
    pub topic_id: i64,
    /// Field definitions
    #[serde(default)]
    pub fields: Vec<FieldData>,
    /// Cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A page of the signed-in user's collections
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMyCollectionsResponse {
    /// Number of pages
    pub pages_count: u32,
    /// Collections on this page
    pub collections: Vec<CollectionData>,
}

/// Body of `POST /collections`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Topic id
    pub topic_id: i64,
    /// Field definitions
    pub fields: Vec<CreateFieldData>,
    /// Cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body of `PUT /collections`
///
/// Fields with an id of `0` are created, missing ones are deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCollectionRequest {
    /// Collection id
    pub id: i64,
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New topic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<i64>,
    /// Complete field list
    pub fields: Vec<FieldData>,
    /// New cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&CollectionData> for EditCollectionRequest {
    fn from(data: &CollectionData) -> Self {
        Self {
            id: data.id,
            name: Some(data.name.clone()),
            description: Some(data.description.clone()),
            topic_id: Some(data.topic_id),
            fields: data.fields.clone(),
            image_url: data.image_url.clone(),
        }
    }
}

impl From<&CollectionData> for CreateCollectionRequest {
    fn from(data: &CollectionData) -> Self {
        Self {
            name: data.name.clone(),
            description: data.description.clone(),
            topic_id: data.topic_id,
            fields: data
                .fields
                .iter()
                .map(|f| CreateFieldData {
                    name: f.name.clone(),
                    field_type: f.field_type,
                })
                .collect(),
            image_url: data.image_url.clone(),
        }
    }
}

/// Row of a collection's item table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItemData {
    /// Item id
    pub id: i64,
    /// Item name
    pub name: String,
    /// Values of the collection's text fields
    #[serde(default)]
    pub string_values: Vec<StringValueData>,
    /// Values of the collection's date fields
    #[serde(default)]
    pub date_time_values: Vec<DateTimeValueData>,
}

/// A collection with its owner flag, fields and item rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCollectionResponse {
    /// Collection id
    pub id: i64,
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Topic id
    pub topic_id: i64,
    /// Cover image
    #[serde(default)]
    pub image_url: Option<String>,
    /// `true` when the signed-in user owns the collection
    #[serde(default)]
    pub is_owner: bool,
    /// Field definitions
    #[serde(default)]
    pub fields: Vec<FieldData>,
    /// Item rows
    #[serde(default)]
    pub items: Vec<CollectionItemData>,
}

impl GetCollectionResponse {
    /// The collection part, without item rows
    #[must_use]
    pub fn collection(&self) -> CollectionData {
        CollectionData {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            topic_id: self.topic_id,
            fields: self.fields.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Sort order of a collection's item table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Query-string value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort and filter parameters of a collection's item table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsQuery {
    /// Sort direction
    pub sort_by: Option<SortDirection>,
    /// Field to sort by, `None` sorts by name
    pub sort_field_id: Option<i64>,
    /// Substring filter on item names
    pub filter_name: Option<String>,
    /// Items must carry every one of these tags
    pub filter_tags: Vec<String>,
}

impl ItemsQuery {
    /// Query pairs; tags repeat the `filterTags` key
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sortBy", sort_by.as_str().to_string()));
        }
        if let Some(field) = self.sort_field_id {
            pairs.push(("sortFieldId", field.to_string()));
        }
        if let Some(name) = self.filter_name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("filterName", name.to_string()));
        }
        pairs.extend(self.filter_tags.iter().map(|t| ("filterTags", t.clone())));
        pairs
    }
}

/// Item rows of a collection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetCollectionItemsResponse {
    /// Item rows
    pub items: Vec<CollectionItemData>,
}

/// Field definitions of a collection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetFieldsResponse {
    /// Field definitions
    pub fields: Vec<FieldData>,
}

/// A topic with its localized names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicData {
    /// Topic id
    pub id: i64,
    /// English name
    pub en_name: String,
    /// Russian name
    pub ru_name: String,
}

/// Largest collections for the home page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetLargestCollectionsResponse {
    /// Collections, largest first
    pub collections: Vec<CollectionData>,
}

// ============================================================================
// Items, values and comments
// ============================================================================

/// Value of an integer field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntValueData {
    /// Field id
    pub field_id: i64,
    /// Value
    pub value: i64,
}

/// Value of a checkbox field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoolValueData {
    /// Field id
    pub field_id: i64,
    /// Value
    pub value: bool,
}

/// Value of a text field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringValueData {
    /// Field id
    pub field_id: i64,
    /// Value
    pub value: String,
}

/// Value of a date field, an ISO-8601 timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeValueData {
    /// Field id
    pub field_id: i64,
    /// Timestamp
    pub value: String,
}

/// Body of `POST|PUT /collections/{id}/items`
///
/// `id` is set when editing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    /// Item id, edit only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    pub name: String,
    /// Tags
    pub tags: Vec<String>,
    /// Integer values
    pub int_fields: Vec<IntValueData>,
    /// Checkbox values
    pub bool_fields: Vec<BoolValueData>,
    /// Text values
    pub string_fields: Vec<StringValueData>,
    /// Date values
    pub date_time_fields: Vec<DateTimeValueData>,
}

/// An item with the fields needed to edit it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetItemForEditingResponse {
    /// Name
    pub name: String,
    /// Tags
    pub tags: Vec<String>,
    /// Integer values
    #[serde(default)]
    pub int_fields: Vec<IntValueData>,
    /// Checkbox values
    #[serde(default)]
    pub bool_fields: Vec<BoolValueData>,
    /// Text values
    #[serde(default)]
    pub string_fields: Vec<StringValueData>,
    /// Date values
    #[serde(default)]
    pub date_time_fields: Vec<DateTimeValueData>,
    /// Field definitions of the owning collection
    #[serde(default)]
    pub fields: Vec<FieldData>,
}

/// Author of a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthorData {
    /// Display name
    pub name: String,
}

/// A comment on an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentData {
    /// Markdown text
    pub text: String,
    /// Author
    pub author: CommentAuthorData,
}

/// Body of `POST /items/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    /// Markdown text
    pub text: String,
}

/// The stored comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentResponse {
    /// Comment as stored
    pub comment: CommentData,
}

/// Comments of an item, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetCommentsResponse {
    /// Comments
    pub comments: Vec<CommentData>,
}

/// An item with its values, comments and like state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetItemResponse {
    /// Name
    pub name: String,
    /// Tags
    pub tags: Vec<String>,
    /// Comments, oldest first
    #[serde(default)]
    pub comments: Vec<CommentData>,
    /// Number of likes
    pub likes_count: i64,
    /// `true` when the signed-in user liked the item
    #[serde(default)]
    pub like: bool,
    /// Field definitions of the owning collection
    #[serde(default)]
    pub fields: Vec<FieldData>,
    /// Integer values
    #[serde(default)]
    pub int_values: Vec<IntValueData>,
    /// Checkbox values
    #[serde(default)]
    pub bool_values: Vec<BoolValueData>,
    /// Text values
    #[serde(default)]
    pub string_values: Vec<StringValueData>,
    /// Date values
    #[serde(default)]
    pub date_time_values: Vec<DateTimeValueData>,
}

/// Owner of the collection a latest item belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestItemOwnerData {
    /// Display name
    pub name: String,
}

/// Collection a latest item belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestCollectionData {
    /// Collection name
    pub name: String,
    /// Owner
    pub owner_data: LatestItemOwnerData,
}

/// A recently added item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestItemData {
    /// Item id
    pub id: i64,
    /// Item name
    pub name: String,
    /// Owning collection
    pub collection: LatestCollectionData,
}

/// Recently added items
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetLatestItemsResponse {
    /// Items, newest first
    pub items: Vec<LatestItemData>,
}

// ============================================================================
// Search and tags
// ============================================================================

/// Full-text search parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Search text
    pub search_string: String,
    /// 1-based page
    pub page: u32,
    /// Page size
    pub count: u32,
}

/// A search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Id of the collection or item
    pub id: i64,
    /// Name of the collection or item
    pub name: String,
}

/// A page of matching collections
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCollectionsResponse {
    /// Number of pages
    pub pages_count: u32,
    /// Matches
    pub collections: Vec<SearchHit>,
}

/// A page of matching items
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemsResponse {
    /// Number of pages
    pub pages_count: u32,
    /// Matches
    pub items: Vec<SearchHit>,
}

/// Tag autocomplete parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTagsRequest {
    /// Prefix to complete
    pub str: String,
    /// Maximum number of suggestions
    pub count: u32,
}

/// A list of tags
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetTagsResponse {
    /// Tags
    pub tags: Vec<String>,
}

// ============================================================================
// Images
// ============================================================================

/// An image file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent with the part
    pub file_name: String,
    /// MIME type, e.g. `image/png`
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Where an uploaded image is served from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveImageResponse {
    /// Public URL
    pub image_url: String,
}
