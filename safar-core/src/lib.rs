pub mod booking;
pub mod directory;
pub mod error;
pub mod package;
pub mod reference;
pub mod repository;
pub mod ticket;

pub use booking::{BookingStatus, BookingView};
pub use directory::DirectoryRecord;
pub use error::{server_message, ApiError, ApiResult};
pub use package::PackagePayload;
pub use repository::{Endpoint, RestBackend};
pub use ticket::TicketPayload;
