//! Reusable rendering pieces shared by the screens.

pub mod footer;
pub mod message_box;

pub use footer::Footer;
pub use message_box::MessageBox;
