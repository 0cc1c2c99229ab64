//! Error conversion glue for `data` feature consumers.
//!
//! The domain layer must not depend on service/repository error types, but
//! downstream crates using `pushkind-folio` with only the `data` feature may
//! still want convenient conversions.

use pushkind_common::repository::errors::RepositoryError;
#[cfg(feature = "server")]
use pushkind_common::services::errors::ServiceError;

use crate::domain::types::TypeConstraintError;
#[cfg(feature = "server")]
use crate::forms::categories::{
    AddCategoryFormError, DeleteCategoryFormError, RenameCategoryFormError,
    ReorderCategoriesFormError,
};
#[cfg(feature = "server")]
use crate::forms::equipment::EquipmentFormError;
#[cfg(feature = "server")]
use crate::forms::galleries::{GalleryFormError, ImageFormError};

#[cfg(feature = "server")]
impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

macro_rules! form_error_into_service_error {
    ($($error:ty),* $(,)?) => {
        $(
            #[cfg(feature = "server")]
            impl From<$error> for ServiceError {
                fn from(val: $error) -> Self {
                    ServiceError::Form(val.to_string())
                }
            }
        )*
    };
}

form_error_into_service_error!(
    AddCategoryFormError,
    RenameCategoryFormError,
    DeleteCategoryFormError,
    ReorderCategoriesFormError,
    GalleryFormError,
    ImageFormError,
    EquipmentFormError,
);
