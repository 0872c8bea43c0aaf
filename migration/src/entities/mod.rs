pub mod ip_country;

pub use ip_country::Entity as IpCountryEntity;
