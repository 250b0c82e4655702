//! Tool parameters extracted from the user's message

pub mod extraction;
