//! Core traits for host-environment seams.

mod redirect;

pub use redirect::LoginRedirect;
