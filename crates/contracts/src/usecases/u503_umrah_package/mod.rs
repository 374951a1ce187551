pub mod form;
pub mod response;

pub use form::UmrahPackageForm;
pub use response::PublishedPackage;
