//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the rental catalog, ratings, and bookings.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod booking;
pub mod car;
pub mod car_rating;
pub mod category;
pub mod company;

// Re-export specific types to avoid conflicts
pub use booking::{
    BookingStatus, Column as BookingColumn, Entity as Booking, Model as BookingModel, RentalType,
};
pub use car::{Column as CarColumn, Entity as Car, Model as CarModel, Transmission};
pub use car_rating::{Column as CarRatingColumn, Entity as CarRating, Model as CarRatingModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use company::{Column as CompanyColumn, Entity as Company, Model as CompanyModel};
