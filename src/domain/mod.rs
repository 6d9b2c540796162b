pub mod category;
pub mod resource;
