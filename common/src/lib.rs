use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use utoipa::{
    openapi::{
        schema::{ObjectBuilder, Schema, Type},
        RefOr,
    },
    PartialSchema, ToSchema,
};
use validator::Validate;

/// Access level carried on a user document and inside every token.
#[derive(Serialize, Deserialize, ToSchema, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

// --- Auth payloads ---

#[derive(Serialize, Deserialize, Validate, ToSchema, Clone, Debug)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Serialize, Deserialize, Validate, ToSchema, Clone, Debug)]
pub struct Credentials {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub result: InsertResult,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

// --- Users ---

/// A user as exposed over the API. The password hash is never part of it.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct RoleUpdate {
    pub role: Role,
}

// --- Open-field resources ---

/// A lesson document. Apart from its id the shape belongs to the client.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Lesson {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A vocabulary document. Apart from its id the shape belongs to the client.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Vocabulary {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Field-level overwrite applied to a stored document.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct DocumentPatch(pub Map<String, Value>);

// The open-field types are plain JSON objects on the wire.
macro_rules! open_object_schema {
    ($ty:ident, $description:literal) => {
        impl PartialSchema for $ty {
            fn schema() -> RefOr<Schema> {
                RefOr::T(Schema::Object(
                    ObjectBuilder::new()
                        .schema_type(Type::Object)
                        .description(Some($description))
                        .build(),
                ))
            }
        }

        impl ToSchema for $ty {
            fn name() -> Cow<'static, str> {
                Cow::Borrowed(stringify!($ty))
            }
        }
    };
}

open_object_schema!(Lesson, "A lesson document with client-defined fields");
open_object_schema!(Vocabulary, "A vocabulary document with client-defined fields");
open_object_schema!(DocumentPatch, "Fields to overwrite on a stored document");

// --- Store operation results ---

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

/// Body of every error response.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}
