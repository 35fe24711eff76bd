//! Auth domain - sign-in and registration screens.

pub mod login;
pub mod register;

pub use login::{LoginEvent, LoginSession, LoginState};
pub use register::{RegisterEvent, RegisterSession, RegisterState};
