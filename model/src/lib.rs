/*!

This library models Spinnaker accounts: the deployment targets a Spinnaker installation talks to.
It provides the backend-independent `AccountType` and `Account` abstractions, the Kubernetes
implementation of them, the `SpinnakerAccount` custom resource definition, and the validation
lifecycle each account goes through before it is given to the platform's services.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use account::{duplicate_names, Account, AccountValidator};
pub use account_type::{AccountKind, AccountType};
pub use configuration::{Configuration, FreeForm};
pub use crd::{
    duplicate_account_names, SpinnakerAccount, SpinnakerAccountSpec, SpinnakerAccountStatus,
};
pub use crd_ext::CrdExt;
pub use error::{Error, Result};
pub use manifest::{convert_manifest, read_manifest, read_validation};
pub use registry::AccountTypes;
pub use validation::{
    validate_account, validate_accounts, AccountReport, SpinnakerValidation, ValidationFailure,
    ValidationPhase, ValidationPolicy, ValidationSetting, ValidationState,
};
pub use wiring::{service_settings, ServiceSettings};

mod account;
mod account_type;
mod configuration;
pub mod constants;
mod crd;
mod crd_ext;
mod error;
pub mod kubernetes;
mod manifest;
mod registry;
mod schema_utils;
mod validation;
mod wiring;
