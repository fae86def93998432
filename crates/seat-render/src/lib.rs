pub mod hit;
pub mod svg;
