pub mod booking_view;
pub mod derived;
pub mod options;
pub mod package_form;
pub mod ticket_form;

#[cfg(test)]
mod test_support;

use safar_core::ApiError;

pub use booking_view::booking_view;
pub use package_form::{HotelRowForm, PackageForm};
pub use ticket_form::TicketForm;

/// Client-side validation failure. Raised before any request is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{0}")]
    Required(String),

    #[error("{0}")]
    Invalid(String),
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Whether an editor creates a record or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(i64),
}
