pub mod common;
pub mod file;
pub mod filter;
pub mod group;
pub mod io;
pub mod tabs;
