pub mod keys;
pub mod multipart;
