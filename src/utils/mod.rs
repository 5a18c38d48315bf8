pub mod phone_validation;
pub use phone_validation::{PhoneValidationError, validate_phone_number};
pub mod url_validation;
pub use url_validation::{UrlValidationError, join_public_url, validate_public_base_url};
