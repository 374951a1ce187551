pub mod executor;

pub use executor::{
    prepare_property_listing, prepare_umrah_package, publish_property_listing,
    publish_submission, publish_umrah_package, PublishError,
};
