use std::{
    fmt,
    fmt::{
        Arguments,
        Display,
    },
    panic::Location,
};

use anyhow::Error;

use crate::error::{
    general_error,
    not_found_error,
};

/// A message attached to another error, with the place it was attached for debug output.
struct Context {
    message: String,
    at: &'static Location<'static>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.at)
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Wraps an error into [`Error`], optionally providing additional context.
pub trait WrapError {
    /// Wraps the object into an [`Error`].
    #[track_caller]
    fn wrap_error(self) -> Error;

    /// Wraps the object into an [`Error`], with an additional message.
    #[track_caller]
    fn wrap_error_with_message<M>(self, message: M) -> Error
    where
        M: Display;
}

impl<E> WrapError for E
where
    E: Into<Error>,
{
    #[track_caller]
    fn wrap_error(self) -> Error {
        self.into()
    }

    #[track_caller]
    fn wrap_error_with_message<M>(self, message: M) -> Error
    where
        M: Display,
    {
        let context = Context {
            message: message.to_string(),
            at: Location::caller(),
        };
        Into::<Error>::into(self).context(context)
    }
}

/// Attaches context to the error side of a [`Result`].
pub trait WrapResultError<T> {
    /// Wraps the error into an [`Error`], with an additional message.
    #[track_caller]
    fn wrap_error_with_message<M>(self, message: M) -> Result<T, Error>
    where
        M: Display;

    /// Wraps the error into an [`Error`], with an additional formatted message.
    #[track_caller]
    fn wrap_error_with_format(self, args: Arguments<'_>) -> Result<T, Error>;
}

impl<T, E> WrapResultError<T> for Result<T, E>
where
    E: WrapError,
{
    #[track_caller]
    fn wrap_error_with_message<M>(self, message: M) -> Result<T, Error>
    where
        M: Display,
    {
        self.map_err(|error| error.wrap_error_with_message(message))
    }

    #[track_caller]
    fn wrap_error_with_format(self, args: Arguments<'_>) -> Result<T, Error> {
        self.map_err(|error| error.wrap_error_with_message(format!("{args}")))
    }
}

/// Converts an [`Option`] into a result producing an [`Error`].
pub trait WrapOptionError<T> {
    /// Fails with a general error carrying the message when the value is missing.
    #[track_caller]
    fn wrap_expectation<M>(self, message: M) -> Result<T, Error>
    where
        M: Display;

    /// Fails with a general error carrying the formatted message when the value is missing.
    #[track_caller]
    fn wrap_expectation_with_format(self, args: Arguments<'_>) -> Result<T, Error>;

    /// Fails with a [`NotFoundError`][`crate::error::NotFoundError`] when the value is missing.
    #[track_caller]
    fn wrap_not_found_error<M>(self, target: M) -> Result<T, Error>
    where
        M: Display;
}

impl<T> WrapOptionError<T> for Option<T> {
    #[track_caller]
    fn wrap_expectation<M>(self, message: M) -> Result<T, Error>
    where
        M: Display,
    {
        match self {
            Some(val) => Ok(val),
            None => Err(general_error(message)),
        }
    }

    #[track_caller]
    fn wrap_expectation_with_format(self, args: Arguments<'_>) -> Result<T, Error> {
        match self {
            Some(val) => Ok(val),
            None => Err(general_error(format!("{args}"))),
        }
    }

    #[track_caller]
    fn wrap_not_found_error<M>(self, target: M) -> Result<T, Error>
    where
        M: Display,
    {
        match self {
            Some(val) => Ok(val),
            None => Err(not_found_error(target)),
        }
    }
}
