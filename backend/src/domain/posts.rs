//! Post actions: input schemas, typed inputs, and the created post draft.
//!
//! Posts are not persisted. Creating one validates the input, stamps an id,
//! the author, and a creation time, and echoes the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Session;
use super::schema::{ObjectSchema, Schema};

/// Maximum number of tags on a post.
pub const MAX_TAGS: usize = 5;

/// Schema for the public demo action.
#[must_use]
pub fn public_post_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("data", required_data())
        .field("optionalField", Schema::string().optional())
}

/// Schema for the protected demo action.
#[must_use]
pub fn protected_post_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("data", required_data())
        .field(
            "title",
            Schema::string()
                .min_length(3)
                .message("Title must be at least 3 characters")
                .optional(),
        )
        .field(
            "amount",
            Schema::number()
                .positive()
                .message("Amount must be positive")
                .optional(),
        )
}

/// Schema for creating a post.
#[must_use]
pub fn create_post_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "title",
            Schema::string()
                .min_length(3)
                .message("Title must be at least 3 characters")
                .max_length(100)
                .message("Title too long"),
        )
        .field(
            "content",
            Schema::string()
                .min_length(10)
                .message("Content must be at least 10 characters"),
        )
        .field(
            "tags",
            Schema::array(Schema::string())
                .max_items(MAX_TAGS)
                .message("Maximum 5 tags allowed")
                .optional(),
        )
        .field("published", Schema::boolean().default_value(false))
}

fn required_data() -> Schema {
    Schema::string()
        .min_length(1)
        .message("Data is required")
        .into()
}

/// Validated input of the public demo action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPostInput {
    /// Free-form payload.
    pub data: String,
    /// Optional extra payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_field: Option<String>,
    /// Caller-supplied keys the schema does not declare.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validated input of the protected demo action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedPostInput {
    /// Free-form payload.
    pub data: String,
    /// Optional title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional positive amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Caller-supplied keys the schema does not declare.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Up to [`MAX_TAGS`] tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Whether the post is visible.
    pub published: bool,
    /// Caller-supplied keys the schema does not declare.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys stamped onto every post; caller-supplied keys with these names are
/// discarded.
const STAMPED_KEYS: [&str; 3] = ["id", "authorId", "createdAt"];

/// A created post.
///
/// Serialises the input fields alongside `id`, `authorId`, and `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    input: CreatePostInput,
    id: Uuid,
    author_id: String,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Draft a post authored by the session's user.
    #[must_use]
    pub fn draft(
        mut input: CreatePostInput,
        author: &Session,
        created_at: DateTime<Utc>,
    ) -> Self {
        for key in STAMPED_KEYS {
            input.extra.remove(key);
        }
        Self {
            input,
            id: Uuid::new_v4(),
            author_id: author.id().to_owned(),
            created_at,
        }
    }

    /// Post identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Author's user id.
    #[must_use]
    pub fn author_id(&self) -> &str {
        self.author_id.as_str()
    }

    /// Validated input the post was created from.
    #[must_use]
    pub const fn input(&self) -> &CreatePostInput {
        &self.input
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
