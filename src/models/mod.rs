mod article;
mod media;
mod user;

pub use article::*;
pub use media::*;
pub use user::*;
