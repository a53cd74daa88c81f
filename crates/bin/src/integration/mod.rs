//! Front-end plumbing for the CLI: the terminal price form and the
//! interactive prediction session built on a shared pipeline handle.

pub(crate) mod form;
pub(crate) mod session;
