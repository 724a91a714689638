//! Clinical data views.

pub mod form;
pub mod list;

pub use form::ClinicalDataForm;
pub use list::ClinicalDataList;
