use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
pub struct Error(OpaqueError);
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error was raised by an account's local well-formedness check.
    pub fn is_format_error(&self) -> bool {
        matches!(self.0, OpaqueError::Format { .. })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum OpaqueError {
    #[snafu(display("Error deserializing configuration: {}", source))]
    ConfigDeserialization { source: serde_json::Error },

    #[snafu(display("Error serializing configuration: {}", source))]
    ConfigSerialization { source: serde_json::Error },

    #[snafu(display(
        "Error serializing configuration: expected Value::Object type but got something else."
    ))]
    ConfigWrongValueType {},

    #[snafu(display("Unable to read '{}' environment: {}", prefix, source))]
    Environment { prefix: String, source: envy::Error },

    #[snafu(display("Unable to read file '{}': {}", path.display(), source))]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid {} account '{}': {}", kind, name, reason))]
    Format {
        kind: String,
        name: String,
        reason: String,
    },

    #[snafu(display("Unable to move account '{}' from {} to {}", name, from, to))]
    IllegalTransition {
        name: String,
        from: String,
        to: String,
    },

    #[snafu(display("Invalid value for '{}': {}", key, source))]
    Key { key: String, source: serde_json::Error },

    #[snafu(display("No account type is registered for '{}'", kind))]
    NotRegistered { kind: String },

    #[snafu(display("Unable to {}: {}", action, source))]
    SerdeYaml {
        action: String,
        source: serde_yaml::Error,
    },

    #[snafu(display("Unknown account type '{}'", value))]
    UnknownAccountKind { value: String },
}
