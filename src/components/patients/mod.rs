//! Patient management views.

pub mod form;
pub mod list;

pub use form::PatientForm;
pub use list::PatientList;
