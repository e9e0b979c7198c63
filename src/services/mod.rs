pub mod article;
pub mod media;
pub mod slug;
pub mod users;
pub mod validation;
