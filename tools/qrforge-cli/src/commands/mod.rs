pub mod batch;
pub mod info;
pub mod preview;
pub mod render;
pub mod validate;
