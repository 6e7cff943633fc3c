pub mod error;
pub mod factory;
pub mod overseerr;
pub mod traits;

pub use error::ClientError;
pub use factory::connect_from_config;
pub use overseerr::OverseerrClient;
pub use traits::MediaRequestService;
