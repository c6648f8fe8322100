pub mod directory;
pub use directory::{Account, CompanyGroup, Role, UserListing, VisibleUser};
pub mod tenancy;
pub use tenancy::{Company, CompanyChanges, CompanyRef, Membership};
