pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod categories;
pub mod equipment;
pub mod galleries;
pub mod main;

/// Converts a submitted form and hands the payload to `service`.
///
/// A form that fails conversion becomes [`ServiceError::Form`] and `service`
/// is never called.
pub fn with_form<F, P, T, S>(form: F, service: S) -> ServiceResult<T>
where
    S: FnOnce(P) -> ServiceResult<T>,
    F: TryInto<P>,
    F::Error: Into<ServiceError>,
{
    let payload = form.try_into().map_err(Into::into)?;
    service(payload)
}
