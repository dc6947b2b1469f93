mod errors;
mod validation_error;
mod wrap;

pub use errors::{
    ConfigurationError,
    ContractViolationError,
    GeneralError,
    NotFoundError,
    configuration_error,
    contract_violation_error,
    general_error,
    not_found_error,
};
pub use validation_error::ValidationError;
pub use wrap::{
    WrapError,
    WrapOptionError,
    WrapResultError,
};
