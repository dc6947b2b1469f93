use anyhow::Error;

/// [`assert`]s that the result is an [`Error`] with the given message.
#[track_caller]
pub fn assert_error_message<T>(result: Result<T, Error>, message: &str) {
    match result {
        Ok(_) => panic!("expected error \"{message}\", got Ok"),
        Err(err) => pretty_assertions::assert_eq!(err.to_string(), message),
    }
}

/// [`assert`]s that the result is an [`Error`] that contains the given message.
#[track_caller]
pub fn assert_error_message_contains<T>(result: Result<T, Error>, message: &str) {
    match result {
        Ok(_) => panic!("expected error containing \"{message}\", got Ok"),
        Err(err) => assert!(
            err.to_string().contains(message),
            "\"{err}\" does not contain \"{message}\""
        ),
    }
}
