pub mod gallery;
pub mod item;
