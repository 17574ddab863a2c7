pub mod ad;
pub mod favorite;

pub use ad::Entity as AdEntity;
pub use favorite::Entity as FavoriteEntity;
