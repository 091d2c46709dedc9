pub mod blob;
pub mod cli;
pub mod image;
pub mod layout;
pub mod offset;
pub mod package;
