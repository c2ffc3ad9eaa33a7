use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use serde::{Deserialize, Deserializer};

/// Instead of making new struct model fields `Option`s, we can use this function when deserializing
/// to assign the default value. This makes the structs more ergonomic to use, and makes yaml/json
/// representations backward compatible.
pub(crate) fn null_to_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::deserialize(d)?;
    let val = opt.unwrap_or_default();
    Ok(val)
}

/// The schema of a free-form object. Kubernetes prunes unknown fields unless the schema says to
/// preserve them, so this marks the object with `x-kubernetes-preserve-unknown-fields`.
pub(crate) fn free_form_schema(_: &mut SchemaGenerator) -> Schema {
    let mut schema = SchemaObject {
        instance_type: Some(InstanceType::Object.into()),
        ..SchemaObject::default()
    };
    schema
        .extensions
        .insert("nullable".to_owned(), serde_json::Value::Bool(true));
    schema.extensions.insert(
        "x-kubernetes-preserve-unknown-fields".to_owned(),
        serde_json::Value::Bool(true),
    );
    schema.into()
}
