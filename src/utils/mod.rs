//! Process-level helpers shared by the library and the admin binary.

pub mod bootstrap;
pub mod retry;
