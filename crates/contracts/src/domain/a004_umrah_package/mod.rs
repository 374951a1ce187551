pub mod aggregate;

pub use aggregate::{MealPlan, UmrahPackage, UmrahPackageDto};
