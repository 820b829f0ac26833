pub mod align;
pub mod catalog;
pub mod localize;
