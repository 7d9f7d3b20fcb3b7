pub mod extract;
pub mod features;
mod source;
