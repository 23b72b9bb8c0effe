pub mod render;
pub mod shape;
