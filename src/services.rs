pub mod account_service;
pub use account_service::{AccountContext, AccountService};
pub mod company_service;
pub use company_service::CompanyService;
pub mod directory_service;
pub use directory_service::DirectoryService;
pub mod invite_service;
pub use invite_service::InviteService;
