pub mod comments;
pub mod feed;
pub mod likes;
pub mod photos;
pub mod policy;
pub mod users;
