pub mod check;
pub mod convert;
pub mod example;
pub mod render;
