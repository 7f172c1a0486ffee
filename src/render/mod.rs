pub mod fragment;
pub mod layout;
pub mod paint;
