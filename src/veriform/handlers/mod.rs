pub mod health;
pub use self::health::health;

pub mod verify_email;
pub use self::verify_email::verify_email;
