pub mod comment;
pub mod like;
pub mod photo;
pub mod user;
