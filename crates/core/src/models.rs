pub mod highlight;
pub mod message;
