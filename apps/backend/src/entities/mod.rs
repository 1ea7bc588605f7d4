pub mod comments;
pub mod countries;
pub mod images;
pub mod phones;
pub mod posts;
pub mod taggables;
pub mod tags;
pub mod users;
pub mod videos;

pub use comments::Entity as Comments;
pub use comments::Model as Comment;
pub use countries::Entity as Countries;
pub use countries::Model as Country;
pub use images::Entity as Images;
pub use images::Model as Image;
pub use phones::Entity as Phones;
pub use phones::Model as Phone;
pub use posts::Entity as Posts;
pub use posts::Model as Post;
pub use taggables::Entity as Taggables;
pub use taggables::Model as Taggable;
pub use tags::Entity as Tags;
pub use tags::Model as Tag;
pub use users::Entity as Users;
pub use users::Model as User;
pub use videos::Entity as Videos;
pub use videos::Model as Video;
