use crate::error::{self, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use snafu::ResultExt;
use std::fmt::Debug;

/// An open-ended key/value payload carried by an account for backend-specific data that is not
/// otherwise modeled. In the CRD it is represented like this:
///
/// ```yaml
/// settings:
///   nullable: true
///   type: object
///   x-kubernetes-preserve-unknown-fields: true
/// ```
pub type FreeForm = Map<String, Value>;

/// The `Configuration` trait is for structs that are carried inside a [`FreeForm`] payload, for
/// example an account's environment scope or a whole legacy account entry.
///
/// The traits aggregated by the `Configuration` trait are typical of "plain old data" types and
/// provide a way for clients to strongly type this data which is otherwise unconstrained by the
/// settings files.
///
pub trait Configuration:
    Serialize + DeserializeOwned + Clone + Debug + Default + Send + Sync + Sized + 'static
{
    /// Convert the `Configuration` object to a serde `Map`.
    fn into_map(self) -> Result<FreeForm> {
        match self.into_value()? {
            Value::Object(map) => Ok(map),
            _ => Err(error::ConfigWrongValueTypeSnafu {}.build().into()),
        }
    }

    /// Convert the `Configuration` object to a serde `Value`.
    fn into_value(self) -> Result<Value> {
        Ok(serde_json::to_value(self).context(error::ConfigSerializationSnafu)?)
    }

    /// Deserialize the `Configuration` object from a serde `Map`.
    fn from_map(map: FreeForm) -> Result<Self> {
        Self::from_value(Value::Object(map))
    }

    /// Deserialize the `Configuration` object from a serde `Value`.
    fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value).context(error::ConfigDeserializationSnafu)?)
    }
}

/// Removes `key` from `map` and deserializes it. A missing key or an explicit `null` produces the
/// type's default value.
pub(crate) fn take_key<T>(map: &mut FreeForm, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match map.remove(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => Ok(serde_json::from_value(value).context(error::KeySnafu { key })?),
    }
}

/// Inserts `value` at a dotted `path` (e.g. `providers.kubernetes.accounts`), creating the
/// intermediate objects. Non-object values found along the path are replaced.
pub(crate) fn insert_path(map: &mut FreeForm, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = map;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_owned(), value);
            return;
        }
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(FreeForm::new()));
        if !entry.is_object() {
            *entry = Value::Object(FreeForm::new());
        }
        current = match entry {
            Value::Object(next) => next,
            // Replaced with an object just above.
            _ => return,
        };
    }
}

/// Looks up the value at a dotted `path`.
pub(crate) fn get_path<'a>(map: &'a FreeForm, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    segments.try_fold(map.get(first)?, |value, segment| {
        value.as_object().and_then(|object| object.get(segment))
    })
}
