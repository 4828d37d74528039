use napi::{Error, Status};
use rawtty_line::LineError;

pub(crate) fn to_napi_error(context: &str, err: LineError) -> Error {
    let status = match err {
        LineError::InvalidArgument(_) => Status::InvalidArg,
        _ => Status::GenericFailure,
    };
    Error::new(status, format!("{context}: {err}"))
}
