pub mod path;
pub mod replay;
mod views;
