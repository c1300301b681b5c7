pub mod admin;
pub mod banner;
pub mod category;
pub mod service;
pub mod service_tag;
pub mod setting;
pub mod tag;

pub use admin::Entity as AdminEntity;
pub use banner::Entity as BannerEntity;
pub use category::Entity as CategoryEntity;
pub use service::Entity as ServiceEntity;
pub use service_tag::Entity as ServiceTagEntity;
pub use setting::Entity as SettingEntity;
pub use tag::Entity as TagEntity;
