//! Declarative input schemas and the validator that applies them.
//!
//! A schema describes the expected shape of a JSON value: which fields are
//! required, optional, or defaulted, and which constraints each value must
//! meet. Validation is pure and total. It either yields the typed,
//! defaulted value or a [`FieldErrors`] map listing every violation, never
//! just the first one.
//!
//! ```
//! use serde_json::json;
//! use server_actions::domain::schema::{ObjectSchema, Schema};
//!
//! let schema = ObjectSchema::new()
//!     .field("title", Schema::string().min_length(3).message("Title must be at least 3 characters"))
//!     .field("published", Schema::boolean().default_value(false));
//!
//! let output = schema.validate(&json!({ "title": "Hello" })).expect("valid input");
//! assert_eq!(output, json!({ "title": "Hello", "published": false }));
//!
//! let errors = schema.validate(&json!({ "title": "Hi" })).expect_err("too short");
//! assert_eq!(
//!     errors.get("title"),
//!     Some(&["Title must be at least 3 characters".to_owned()][..])
//! );
//! ```

mod email;
mod field_errors;
mod validate;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use field_errors::{FieldErrors, FieldPath, ROOT_PATH};

/// Message reported for a missing required value unless overridden.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Failure modes of [`ObjectSchema::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The input violated one or more constraints.
    #[error("{}", .0.summary())]
    Invalid(FieldErrors),
    /// The input satisfied the schema but did not fit the target type.
    #[error("validated input could not be decoded: {message}")]
    Decode {
        /// Decoder diagnostics.
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Presence {
    Required,
    Optional,
    Default(Value),
}

trait Constraint {
    fn default_message(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
struct Check<C> {
    constraint: C,
    message: Option<String>,
}

impl<C: Constraint> Check<C> {
    const fn new(constraint: C) -> Self {
        Self {
            constraint,
            message: None,
        }
    }

    fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.constraint.default_message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringConstraint {
    MinLength(usize),
    MaxLength(usize),
    Email,
}

impl Constraint for StringConstraint {
    fn default_message(&self) -> String {
        match self {
            Self::MinLength(min) => format!("String must contain at least {min} character(s)"),
            Self::MaxLength(max) => format!("String must contain at most {max} character(s)"),
            Self::Email => "Invalid email".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberConstraint {
    Positive,
    Integer,
}

impl Constraint for NumberConstraint {
    fn default_message(&self) -> String {
        match self {
            Self::Positive => "Number must be greater than 0".to_owned(),
            Self::Integer => "Expected integer, received float".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayConstraint {
    MinItems(usize),
    MaxItems(usize),
}

impl Constraint for ArrayConstraint {
    fn default_message(&self) -> String {
        match self {
            Self::MinItems(min) => format!("Array must contain at least {min} element(s)"),
            Self::MaxItems(max) => format!("Array must contain at most {max} element(s)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    String(Vec<Check<StringConstraint>>),
    Number(Vec<Check<NumberConstraint>>),
    Boolean,
    Array {
        items: Box<Schema>,
        checks: Vec<Check<ArrayConstraint>>,
    },
    Object(ObjectSchema),
}

impl Kind {
    const fn expected(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean => "boolean",
            Self::Array { .. } => "array",
            Self::Object(_) => "object",
        }
    }
}

/// Schema for a single value of any supported kind.
///
/// Build one with [`Schema::string`], [`Schema::number`],
/// [`Schema::boolean`], [`Schema::array`], or by converting an
/// [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: Kind,
    presence: Presence,
    required_message: Option<String>,
}

macro_rules! presence_methods {
    () => {
        /// Accept a missing or `null` value and omit it from the output.
        #[must_use]
        pub fn optional(mut self) -> Self {
            self.presence = Presence::Optional;
            self
        }

        /// Substitute `value` when the value is missing or `null`.
        ///
        /// The default is validated like caller input.
        #[must_use]
        pub fn default_value(mut self, value: impl Into<Value>) -> Self {
            self.presence = Presence::Default(value.into());
            self
        }

        /// Message reported when a required value is missing.
        #[must_use]
        pub fn required_message(mut self, message: impl Into<String>) -> Self {
            self.required_message = Some(message.into());
            self
        }
    };
}

macro_rules! check_message_method {
    () => {
        /// Override the message of the most recently added constraint.
        ///
        /// Without any constraint, overrides the message reported when a
        /// required value is missing.
        #[must_use]
        pub fn message(mut self, message: impl Into<String>) -> Self {
            match self.checks.last_mut() {
                Some(check) => check.message = Some(message.into()),
                None => self.required_message = Some(message.into()),
            }
            self
        }
    };
}

impl Schema {
    /// Schema for a JSON string.
    #[must_use]
    pub fn string() -> StringSchema {
        StringSchema {
            checks: Vec::new(),
            presence: Presence::Required,
            required_message: None,
        }
    }

    /// Schema for a JSON number.
    #[must_use]
    pub fn number() -> NumberSchema {
        NumberSchema {
            checks: Vec::new(),
            presence: Presence::Required,
            required_message: None,
        }
    }

    /// Schema for a JSON boolean.
    #[must_use]
    pub fn boolean() -> BooleanSchema {
        BooleanSchema {
            presence: Presence::Required,
            required_message: None,
        }
    }

    /// Schema for a JSON array whose elements match `items`.
    #[must_use]
    pub fn array(items: impl Into<Self>) -> ArraySchema {
        ArraySchema {
            items: Box::new(items.into()),
            checks: Vec::new(),
            presence: Presence::Required,
            required_message: None,
        }
    }

    presence_methods!();

    /// Validate `input` against this schema.
    ///
    /// # Errors
    /// Returns every violation keyed by field path.
    pub fn validate(&self, input: &Value) -> Result<Value, FieldErrors> {
        validate::validate_root(self, input)
    }
}

/// Builder for string schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct StringSchema {
    checks: Vec<Check<StringConstraint>>,
    presence: Presence,
    required_message: Option<String>,
}

impl StringSchema {
    /// Require at least `min` characters (Unicode scalar values).
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.checks.push(Check::new(StringConstraint::MinLength(min)));
        self
    }

    /// Allow at most `max` characters (Unicode scalar values).
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.checks.push(Check::new(StringConstraint::MaxLength(max)));
        self
    }

    /// Require an email address.
    #[must_use]
    pub fn email(mut self) -> Self {
        self.checks.push(Check::new(StringConstraint::Email));
        self
    }

    check_message_method!();
    presence_methods!();
}

impl From<StringSchema> for Schema {
    fn from(value: StringSchema) -> Self {
        Self {
            kind: Kind::String(value.checks),
            presence: value.presence,
            required_message: value.required_message,
        }
    }
}

/// Builder for number schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberSchema {
    checks: Vec<Check<NumberConstraint>>,
    presence: Presence,
    required_message: Option<String>,
}

impl NumberSchema {
    /// Require a value strictly greater than zero.
    #[must_use]
    pub fn positive(mut self) -> Self {
        self.checks.push(Check::new(NumberConstraint::Positive));
        self
    }

    /// Require a whole number.
    #[must_use]
    pub fn integer(mut self) -> Self {
        self.checks.push(Check::new(NumberConstraint::Integer));
        self
    }

    check_message_method!();
    presence_methods!();
}

impl From<NumberSchema> for Schema {
    fn from(value: NumberSchema) -> Self {
        Self {
            kind: Kind::Number(value.checks),
            presence: value.presence,
            required_message: value.required_message,
        }
    }
}

/// Builder for boolean schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanSchema {
    presence: Presence,
    required_message: Option<String>,
}

impl BooleanSchema {
    presence_methods!();
}

impl From<BooleanSchema> for Schema {
    fn from(value: BooleanSchema) -> Self {
        Self {
            kind: Kind::Boolean,
            presence: value.presence,
            required_message: value.required_message,
        }
    }
}

/// Builder for array schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    items: Box<Schema>,
    checks: Vec<Check<ArrayConstraint>>,
    presence: Presence,
    required_message: Option<String>,
}

impl ArraySchema {
    /// Require at least `min` elements.
    #[must_use]
    pub fn min_items(mut self, min: usize) -> Self {
        self.checks.push(Check::new(ArrayConstraint::MinItems(min)));
        self
    }

    /// Allow at most `max` elements.
    #[must_use]
    pub fn max_items(mut self, max: usize) -> Self {
        self.checks.push(Check::new(ArrayConstraint::MaxItems(max)));
        self
    }

    check_message_method!();
    presence_methods!();
}

impl From<ArraySchema> for Schema {
    fn from(value: ArraySchema) -> Self {
        Self {
            kind: Kind::Array {
                items: value.items,
                checks: value.checks,
            },
            presence: value.presence,
            required_message: value.required_message,
        }
    }
}

/// Schema for a JSON object with named fields.
///
/// Fields are validated in declaration order. Keys not declared in the
/// schema are copied to the output unchanged unless
/// [`ObjectSchema::strip_unknown`] is set. Convert into [`Schema`] to nest an
/// object inside another object or an array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<(String, Schema)>,
    strip_unknown: bool,
}

impl ObjectSchema {
    /// Object schema without fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field, replacing any earlier declaration with the same name.
    #[must_use]
    pub fn field(mut self, name: &str, schema: impl Into<Schema>) -> Self {
        let schema = schema.into();
        match self.fields.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((name.to_owned(), schema)),
        }
        self
    }

    /// Drop keys the schema does not declare from the output.
    #[must_use]
    pub fn strip_unknown(mut self) -> Self {
        self.strip_unknown = true;
        self
    }

    fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|(declared, _)| declared == name)
    }

    /// Declared field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Validate `input`, returning the defaulted output object.
    ///
    /// # Errors
    /// Returns every violation keyed by field path.
    pub fn validate(&self, input: &Value) -> Result<Value, FieldErrors> {
        validate::validate_object_root(self, input)
    }

    /// Validate `input` and decode the defaulted output into `T`.
    ///
    /// # Errors
    /// Returns [`SchemaError::Invalid`] for constraint violations and
    /// [`SchemaError::Decode`] when the validated value does not fit `T`.
    pub fn parse<T: DeserializeOwned>(&self, input: &Value) -> Result<T, SchemaError> {
        let output = self.validate(input).map_err(SchemaError::Invalid)?;
        serde_json::from_value(output).map_err(|error| SchemaError::Decode {
            message: error.to_string(),
        })
    }
}

impl From<ObjectSchema> for Schema {
    fn from(value: ObjectSchema) -> Self {
        Self {
            kind: Kind::Object(value),
            presence: Presence::Required,
            required_message: None,
        }
    }
}
