use crate::codec::finite::find_non_finite;
use crate::error::{Result, SerializerError};
use crate::schema::Entity;
use crate::types::{Attribute, AttributeList, AttributeValue, KEY_ATTRIBUTE};
use serde_json::{Map, Number, Value};

/// Converts one record's own scalar fields to and from attributes.
///
/// Attribute names at this boundary are bare. Decoding must ignore names
/// it does not recognise.
pub trait ScalarCodec {
    fn encode<E: Entity>(&self, entity: &E) -> Result<AttributeList>;
    fn decode<E: Entity>(&self, entity: &mut E, attributes: AttributeList) -> Result<()>;

    /// Fail with `InvalidEntityKind` unless `entity` has a shape this
    /// codec can load into. Checked once per load, on the root.
    fn ensure_record<E: Entity>(&self, _entity: &E) -> Result<()> {
        Ok(())
    }
}

/// Scalar codec backed by the record's serde implementation.
///
/// Every top-level field must serialize to a JSON scalar or a byte array
/// (stored as `Bytes`); objects and other arrays belong in relations.
/// Non-finite floats are rejected since JSON cannot carry them. Decoding
/// replaces `entity` wholesale with the deserialized record, so it runs
/// before keys and relations are set.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeScalarCodec;

impl ScalarCodec for SerdeScalarCodec {
    fn encode<E: Entity>(&self, entity: &E) -> Result<AttributeList> {
        if let Some(field) = find_non_finite(entity) {
            return Err(SerializerError::ScalarEncode(format!(
                "field `{field}` holds a non-finite float"
            )));
        }

        let value = serde_json::to_value(entity)
            .map_err(|e| SerializerError::ScalarEncode(e.to_string()))?;
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(SerializerError::InvalidEntityKind(format!(
                    "expected a record, found {}",
                    json_kind(&other)
                )))
            }
        };

        let indexed = E::indexed_fields();
        let mut attributes = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            if name == KEY_ATTRIBUTE {
                return Err(SerializerError::ScalarEncode(format!(
                    "field `{KEY_ATTRIBUTE}` is reserved for the primary key"
                )));
            }
            let value = scalar_from_json(&name, value)?;
            let is_indexed = indexed.contains(&name.as_str());
            attributes.push(Attribute::new(name, value).with_indexed(is_indexed));
        }
        Ok(attributes)
    }

    fn decode<E: Entity>(&self, entity: &mut E, attributes: AttributeList) -> Result<()> {
        let mut fields = Map::new();
        for attribute in attributes {
            let value = json_from_scalar(&attribute.name, attribute.value)?;
            fields.insert(attribute.name, value);
        }

        *entity = serde_json::from_value(Value::Object(fields))
            .map_err(|e| SerializerError::ScalarDecode(e.to_string()))?;
        Ok(())
    }

    fn ensure_record<E: Entity>(&self, entity: &E) -> Result<()> {
        match serde_json::to_value(entity) {
            Ok(Value::Object(_)) => Ok(()),
            Ok(other) => Err(SerializerError::InvalidEntityKind(format!(
                "expected a record, found {}",
                json_kind(&other)
            ))),
            Err(e) => Err(SerializerError::InvalidEntityKind(e.to_string())),
        }
    }
}

fn scalar_from_json(field: &str, value: Value) -> Result<AttributeValue> {
    match value {
        Value::Null => Ok(AttributeValue::Null),
        Value::Bool(b) => Ok(AttributeValue::Bool(b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(AttributeValue::Int(i))
            } else if n.is_u64() {
                Err(SerializerError::ScalarEncode(format!(
                    "field `{field}` is out of range: {n}"
                )))
            } else {
                n.as_f64().map(AttributeValue::Float).ok_or_else(|| {
                    SerializerError::ScalarEncode(format!("field `{field}` is not a number"))
                })
            }
        }
        Value::String(s) => Ok(AttributeValue::Text(s)),
        Value::Array(items) => match byte_array(&items) {
            Some(bytes) => Ok(AttributeValue::Bytes(bytes)),
            None => Err(SerializerError::ScalarEncode(format!(
                "field `{field}` is an array, not a byte string; relation fields must be skipped by serde"
            ))),
        },
        other => Err(SerializerError::ScalarEncode(format!(
            "field `{field}` is {}, not a scalar; relation fields must be skipped by serde",
            json_kind(&other)
        ))),
    }
}

// `Vec<u8>` and `[u8; N]` serialize as arrays of small integers
fn byte_array(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

fn json_from_scalar(field: &str, value: AttributeValue) -> Result<Value> {
    match value {
        AttributeValue::Null => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(b)),
        AttributeValue::Int(i) => Ok(Value::Number(i.into())),
        AttributeValue::Float(f) => Number::from_f64(f).map(Value::Number).ok_or_else(|| {
            SerializerError::ScalarDecode(format!("field `{field}` holds a non-finite float"))
        }),
        AttributeValue::Text(s) => Ok(Value::String(s)),
        AttributeValue::Bytes(bytes) => Ok(Value::Array(
            bytes.into_iter().map(|b| Value::Number(b.into())).collect(),
        )),
        AttributeValue::Key(_) => Err(SerializerError::ScalarDecode(format!(
            "field `{field}` holds a key, not a scalar"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
