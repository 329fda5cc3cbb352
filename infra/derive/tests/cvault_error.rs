use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
#[error("backend unavailable")]
struct BackendError;

#[cvault_derive::cvault_error]
pub enum SampleError {
    #[error("Backend failure{}: {source}", format_context(.context))]
    Backend {
        #[source]
        source: BackendError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Bad input{}: {message}", format_context(.context))]
    Input { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[test]
fn from_source_wraps_variant() {
    let err: SampleError = BackendError.into();
    assert!(matches!(err, SampleError::Backend { context: None, .. }));
}

#[test]
fn context_annotates_source_results() {
    let result: Result<(), BackendError> = Err(BackendError);
    let err = result.context("while syncing").unwrap_err();

    assert!(matches!(err, SampleError::Backend { .. }));
    assert_eq!(err.to_string(), "Backend failure (while syncing): backend unavailable");
}

#[test]
fn context_annotates_own_results() {
    let result: Result<(), SampleError> =
        Err(SampleError::Input { message: "empty".into(), context: None });
    let err = result.context("parsing record").unwrap_err();

    assert_eq!(err.to_string(), "Bad input (parsing record): empty");
}

#[test]
fn internal_from_strings() {
    let err: SampleError = "logic error".into();
    assert!(matches!(err, SampleError::Internal { .. }));

    let err: SampleError = String::from("formatted").into();
    assert_eq!(err.to_string(), "Internal error: formatted");
}

#[test]
fn display_without_context_is_bare() {
    let err = SampleError::Input { message: "missing field".into(), context: None };
    assert_eq!(err.to_string(), "Bad input: missing field");
}
