use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{FieldError, ModelError};

/// Stored item record. `id` is assigned by the server on create and never
/// changes afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Item {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Pen")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 1.5)]
    pub price: f64,
    pub tax: Option<f64>,
}

impl Item {
    /// Build a record with a freshly generated UUID v4 id.
    pub fn create(input: ItemInput) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), input)
    }

    /// Build a record from `input`, keeping the given id. Every other field is
    /// taken from `input`, so this is also the full-replace path for updates.
    pub fn with_id(id: String, input: ItemInput) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            tax: input.tax,
        }
    }

    pub fn input(&self) -> ItemInput {
        ItemInput {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            tax: self.tax,
        }
    }
}

/// Create/update payload. Does not carry `id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ItemInput {
    #[schema(example = "Pen")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = 1.5)]
    pub price: f64,
    #[serde(default)]
    pub tax: Option<f64>,
}

impl ItemInput {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self { name: name.into(), description: None, price, tax: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tax(mut self, tax: f64) -> Self {
        self.tax = Some(tax);
        self
    }

    /// Check a raw JSON body against the item schema.
    ///
    /// Types are checked strictly: numbers in strings are not coerced. Every
    /// failing field is reported, not just the first one. Unknown keys are
    /// ignored.
    pub fn from_json(value: &Value) -> Result<Self, ModelError> {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return Err(ModelError::field("body", "expected a JSON object")),
        };

        let mut errors = Vec::new();
        let name = required_string(obj, "name", &mut errors);
        let description = optional_string(obj, "description", &mut errors);
        let price = required_number(obj, "price", &mut errors);
        let tax = optional_number(obj, "tax", &mut errors);

        match (name, price) {
            (Some(name), Some(price)) if errors.is_empty() => {
                let input = Self { name, description, price, tax };
                input.validate()?;
                Ok(input)
            }
            _ => Err(ModelError::Validation(errors)),
        }
    }

    /// Value-level checks that hold regardless of how the input was built.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        }
        if !self.price.is_finite() {
            errors.push(FieldError::new("price", "must be a finite number"));
        }
        if matches!(self.tax, Some(t) if !t.is_finite()) {
            errors.push(FieldError::new("tax", "must be a finite number"));
        }
        if errors.is_empty() { Ok(()) } else { Err(ModelError::Validation(errors)) }
    }
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn required_string(obj: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    match present(obj, field) {
        None => {
            errors.push(FieldError::new(field, "field required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new(field, "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "expected a string"));
            None
        }
    }
}

fn optional_string(obj: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    match present(obj, field) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "expected a string or null"));
            None
        }
    }
}

fn required_number(obj: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    match present(obj, field) {
        None => {
            errors.push(FieldError::new(field, "field required"));
            None
        }
        Some(v) => match v.as_f64() {
            Some(n) => Some(n),
            None => {
                errors.push(FieldError::new(field, "expected a number"));
                None
            }
        },
    }
}

fn optional_number(obj: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    let v = present(obj, field)?;
    match v.as_f64() {
        Some(n) => Some(n),
        None => {
            errors.push(FieldError::new(field, "expected a number or null"));
            None
        }
    }
}
