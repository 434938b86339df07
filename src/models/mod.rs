pub mod account;
pub mod enums;
pub mod medication;
pub mod notification;
pub mod reminder;

pub use account::*;
pub use medication::*;
pub use notification::*;
pub use reminder::*;
