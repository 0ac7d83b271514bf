pub mod contact;
pub mod user;

pub use contact::{Contact, ContactFields, ContactResponse, ContactsResponse, Pagination};
pub use user::{AuthResponse, User, UserResponse};
