//! Catalog business logic - categories, companies and cars.
//!
//! Everything here is plain data access used for browsing. The `create_*` functions
//! are the administrative entry points used by the fleet seed; they are generic over
//! [`ConnectionTrait`] so the seed can run them inside one transaction.

use crate::{
    core::rating,
    entities::{Car, CarRating, Category, Company, Transmission, car, car_rating, category, company},
    errors::{Error, Result},
};
use sea_orm::{
    Condition, JoinType, QueryOrder, QuerySelect, Set,
    prelude::*,
    sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr},
};
use std::collections::HashMap;

/// Number of cars shown on the home view.
pub const FEATURED_CAR_LIMIT: u64 = 6;

/// A car together with the names of its company and category.
#[derive(Debug, Clone, PartialEq)]
pub struct CarListing {
    /// The car record
    pub car: car::Model,
    /// Name of the car's company
    pub company_name: String,
    /// Name of the car's category
    pub category_name: String,
}

impl CarListing {
    /// Display label such as "Toyota Corolla (2022)".
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} {} ({})",
            self.company_name, self.car.name, self.car.model_year
        )
    }
}

/// Everything the car detail view shows.
#[derive(Debug, Clone)]
pub struct CarDetail {
    /// The car with its company and category names
    pub listing: CarListing,
    /// All ratings for the car, newest first
    pub ratings: Vec<car_rating::Model>,
    /// The requesting user's own rating, if any
    pub user_rating: Option<car_rating::Model>,
}

/// Categories plus a handful of available cars.
#[derive(Debug, Clone)]
pub struct HomeView {
    /// All categories, alphabetical
    pub categories: Vec<category::Model>,
    /// Up to [`FEATURED_CAR_LIMIT`] available cars
    pub featured_cars: Vec<car::Model>,
}

/// Arguments for [`create_car`].
#[derive(Debug, Clone)]
pub struct NewCar {
    /// Owning category
    pub category_id: i64,
    /// Owning company
    pub company_id: i64,
    /// Model name
    pub name: String,
    /// Model year
    pub model_year: i32,
    /// Gearbox
    pub transmission: Transmission,
    /// Seat count, must be positive
    pub seats: i32,
    /// Price per hour
    pub hourly_rate: f64,
    /// Price per day
    pub daily_rate: f64,
    /// Price per 30-day month
    pub monthly_rate: f64,
    /// Free-form description
    pub description: String,
    /// Whether the car is listed
    pub is_available: bool,
}

fn validate_name(kind: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{kind} name cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn validate_rate(kind: &str, rate: f64) -> Result<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(Error::validation(format!(
            "{kind} rate must be a non-negative amount, got {rate}"
        )));
    }
    Ok(())
}

/// Creates a category.
pub async fn create_category<C>(db: &C, name: &str, description: &str) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let name = validate_name("Category", name)?;
    category::ActiveModel {
        name: Set(name),
        description: Set(description.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a company.
pub async fn create_company<C>(db: &C, name: &str, description: &str) -> Result<company::Model>
where
    C: ConnectionTrait,
{
    let name = validate_name("Company", name)?;
    company::ActiveModel {
        name: Set(name),
        description: Set(description.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a car with zeroed rating aggregates.
///
/// # Errors
/// Returns a validation error for a blank name, non-positive seat count or a
/// negative/non-finite rate, and `CategoryNotFound`/`CompanyNotFound` when the
/// referenced records do not exist.
pub async fn create_car<C>(db: &C, new_car: NewCar) -> Result<car::Model>
where
    C: ConnectionTrait,
{
    let name = validate_name("Car", &new_car.name)?;
    if new_car.seats <= 0 {
        return Err(Error::validation(format!(
            "Seat count must be positive, got {}",
            new_car.seats
        )));
    }
    validate_rate("Hourly", new_car.hourly_rate)?;
    validate_rate("Daily", new_car.daily_rate)?;
    validate_rate("Monthly", new_car.monthly_rate)?;

    Category::find_by_id(new_car.category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: new_car.category_id.to_string(),
        })?;
    Company::find_by_id(new_car.company_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            name: new_car.company_id.to_string(),
        })?;

    car::ActiveModel {
        category_id: Set(new_car.category_id),
        company_id: Set(new_car.company_id),
        name: Set(name),
        model_year: Set(new_car.model_year),
        transmission: Set(new_car.transmission),
        seats: Set(new_car.seats),
        hourly_rate: Set(new_car.hourly_rate),
        daily_rate: Set(new_car.daily_rate),
        monthly_rate: Set(new_car.monthly_rate),
        description: Set(new_car.description),
        is_available: Set(new_car.is_available),
        average_rating: Set(0.0),
        total_ratings: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Loads a car after writing to its row, which holds the row's write lock until the
/// surrounding transaction ends. Writers that claim the same car run one at a time.
pub(crate) async fn lock_car<C>(db: &C, car_id: i64) -> Result<car::Model>
where
    C: ConnectionTrait,
{
    Car::update_many()
        .col_expr(car::Column::IsAvailable, Expr::col(car::Column::IsAvailable).into())
        .filter(car::Column::Id.eq(car_id))
        .exec(db)
        .await?;

    Car::find_by_id(car_id)
        .one(db)
        .await?
        .ok_or(Error::CarNotFound { car_id })
}

/// All categories, alphabetical.
pub async fn list_categories<C>(db: &C) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All companies, alphabetical.
pub async fn list_companies<C>(db: &C) -> Result<Vec<company::Model>>
where
    C: ConnectionTrait,
{
    Company::find()
        .order_by_asc(company::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a company by exact name.
pub async fn get_company_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<company::Model>> {
    Company::find()
        .filter(company::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a car by id, available or not.
pub async fn get_car_by_id<C>(db: &C, car_id: i64) -> Result<Option<car::Model>>
where
    C: ConnectionTrait,
{
    Car::find_by_id(car_id).one(db).await.map_err(Into::into)
}

/// Categories and the first few available cars.
pub async fn home(db: &DatabaseConnection) -> Result<HomeView> {
    let categories = list_categories(db).await?;
    let featured_cars = Car::find()
        .filter(car::Column::IsAvailable.eq(true))
        .order_by_asc(car::Column::Id)
        .limit(FEATURED_CAR_LIMIT)
        .all(db)
        .await?;
    Ok(HomeView {
        categories,
        featured_cars,
    })
}

/// Available cars in a category.
pub async fn cars_in_category(db: &DatabaseConnection, category_id: i64) -> Result<Vec<car::Model>> {
    Car::find()
        .filter(car::Column::CategoryId.eq(category_id))
        .filter(car::Column::IsAvailable.eq(true))
        .order_by_asc(car::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Available cars from a company.
pub async fn cars_by_company(db: &DatabaseConnection, company_id: i64) -> Result<Vec<car::Model>> {
    Car::find()
        .filter(car::Column::CompanyId.eq(company_id))
        .filter(car::Column::IsAvailable.eq(true))
        .order_by_asc(car::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Available cars, best rated first.
pub async fn list_available_cars(db: &DatabaseConnection) -> Result<Vec<car::Model>> {
    Car::find()
        .filter(car::Column::IsAvailable.eq(true))
        .order_by_desc(car::Column::AverageRating)
        .order_by_asc(car::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn name_maps(
    db: &DatabaseConnection,
) -> Result<(HashMap<i64, String>, HashMap<i64, String>)> {
    let companies = Company::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let categories = Category::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    Ok((companies, categories))
}

fn to_listing(
    car: car::Model,
    companies: &HashMap<i64, String>,
    categories: &HashMap<i64, String>,
) -> CarListing {
    let company_name = companies.get(&car.company_id).cloned().unwrap_or_default();
    let category_name = categories
        .get(&car.category_id)
        .cloned()
        .unwrap_or_default();
    CarListing {
        car,
        company_name,
        category_name,
    }
}

/// Attaches company and category names to a list of cars, keeping their order.
pub async fn describe_cars(db: &DatabaseConnection, cars: Vec<car::Model>) -> Result<Vec<CarListing>> {
    let (companies, categories) = name_maps(db).await?;
    Ok(cars
        .into_iter()
        .map(|car| to_listing(car, &companies, &categories))
        .collect())
}

/// Builds `%needle%` with the LIKE wildcards in `needle` escaped.
fn contains_pattern(needle: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

fn lower_contains<T>(column: T, needle: &str) -> SimpleExpr
where
    T: IntoColumnRef,
{
    Expr::expr(Func::lower(Expr::col(column))).like(contains_pattern(needle))
}

/// Available cars whose name, company name or category name contains `query`,
/// ignoring case. A blank query matches nothing.
///
/// Matching runs in the database through `LOWER(..) LIKE`, so case folding is
/// whatever the backend's `LOWER` does (ASCII only on `SQLite`).
pub async fn search_cars(db: &DatabaseConnection, query: &str) -> Result<Vec<CarListing>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let cars = Car::find()
        .join(JoinType::InnerJoin, car::Relation::Company.def())
        .join(JoinType::InnerJoin, car::Relation::Category.def())
        .filter(car::Column::IsAvailable.eq(true))
        .filter(
            Condition::any()
                .add(lower_contains((car::Entity, car::Column::Name), &needle))
                .add(lower_contains((company::Entity, company::Column::Name), &needle))
                .add(lower_contains((category::Entity, category::Column::Name), &needle)),
        )
        .order_by_asc(car::Column::Id)
        .all(db)
        .await?;

    describe_cars(db, cars).await
}

/// The car, its ratings newest first, and `user_id`'s own rating.
///
/// # Errors
/// Returns `CarNotFound` if the car does not exist.
pub async fn car_detail(
    db: &DatabaseConnection,
    car_id: i64,
    user_id: Option<&str>,
) -> Result<CarDetail> {
    let car = get_car_by_id(db, car_id)
        .await?
        .ok_or(Error::CarNotFound { car_id })?;
    let listing = describe_cars(db, vec![car])
        .await?
        .pop()
        .ok_or(Error::CarNotFound { car_id })?;

    let ratings = CarRating::find()
        .filter(car_rating::Column::CarId.eq(car_id))
        .order_by_desc(car_rating::Column::CreatedAt)
        .order_by_desc(car_rating::Column::Id)
        .all(db)
        .await?;
    let user_rating = match user_id {
        Some(uid) => rating::get_user_rating(db, car_id, uid).await?,
        None => None,
    };

    Ok(CarDetail {
        listing,
        ratings,
        user_rating,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_car_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut blank = sample_new_car(1, 1, "   ");
        let result = create_car(&db, blank.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        blank.name = "Civic".to_string();
        blank.seats = 0;
        let result = create_car(&db, blank.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        blank.seats = 5;
        blank.daily_rate = -1.0;
        let result = create_car(&db, blank.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        blank.daily_rate = f64::NAN;
        let result = create_car(&db, blank).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_rejects_blank_name() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let result = create_category(&db, "  ", "").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_car_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;
        let company = create_company(&db, "Toyota", "").await?;

        let result = create_car(&db, sample_new_car(42, company.id, "Corolla")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::CategoryNotFound { name } if name == "42"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_car_starts_unrated() -> Result<()> {
        let (_db, car) = setup_with_car().await?;
        assert_eq!(car.average_rating, 0.0);
        assert_eq!(car.total_ratings, 0);
        assert!(car.is_available);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_available_cars_ordered_by_rating() -> Result<()> {
        let db = setup_test_db().await?;
        let (category, company) = create_test_catalog(&db).await?;
        let low = create_test_car(&db, category.id, company.id, "Low").await?;
        let high = create_test_car(&db, category.id, company.id, "High").await?;
        let mut hidden = sample_new_car(category.id, company.id, "Hidden");
        hidden.is_available = false;
        create_car(&db, hidden).await?;

        crate::core::rating::submit_rating(&db, low.id, "u1", 2, "").await?;
        crate::core::rating::submit_rating(&db, high.id, "u1", 5, "").await?;

        let cars = list_available_cars(&db).await?;
        let names: Vec<&str> = cars.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_matches_name_company_and_category() -> Result<()> {
        let db = setup_test_db().await?;
        let suv = create_category(&db, "SUV", "").await?;
        let compact = create_category(&db, "Compact", "").await?;
        let toyota = create_company(&db, "Toyota", "").await?;
        let honda = create_company(&db, "Honda", "").await?;

        create_test_car(&db, suv.id, toyota.id, "RAV4").await?;
        create_test_car(&db, compact.id, honda.id, "Civic").await?;
        create_test_car(&db, compact.id, toyota.id, "Yaris").await?;

        let by_name = search_cars(&db, "civ").await?;
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].car.name, "Civic");

        let by_company = search_cars(&db, "TOYOTA").await?;
        assert_eq!(by_company.len(), 2);

        let by_category = search_cars(&db, "suv").await?;
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].label(), format!("Toyota RAV4 ({})", 2022));

        assert!(search_cars(&db, "   ").await?.is_empty());
        assert!(search_cars(&db, "tesla").await?.is_empty());
        assert!(search_cars(&db, "%").await?.is_empty());
        assert!(search_cars(&db, "_").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_search_skips_unavailable_cars() -> Result<()> {
        let db = setup_test_db().await?;
        let (category, company) = create_test_catalog(&db).await?;
        let mut retired = sample_new_car(category.id, company.id, "Retired");
        retired.is_available = false;
        create_car(&db, retired).await?;

        assert!(search_cars(&db, "retired").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_category_and_company_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let suv = create_category(&db, "SUV", "").await?;
        let compact = create_category(&db, "Compact", "").await?;
        let toyota = create_company(&db, "Toyota", "").await?;

        create_test_car(&db, suv.id, toyota.id, "RAV4").await?;
        create_test_car(&db, compact.id, toyota.id, "Yaris").await?;

        let suvs = cars_in_category(&db, suv.id).await?;
        assert_eq!(suvs.len(), 1);
        assert_eq!(suvs[0].name, "RAV4");

        let toyotas = cars_by_company(&db, toyota.id).await?;
        assert_eq!(toyotas.len(), 2);

        assert_eq!(
            get_category_by_name(&db, "Compact").await?.unwrap().id,
            compact.id
        );
        assert!(get_company_by_name(&db, "Ford").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_home_limits_featured_cars() -> Result<()> {
        let db = setup_test_db().await?;
        let (category, company) = create_test_catalog(&db).await?;
        for i in 0..8 {
            create_test_car(&db, category.id, company.id, &format!("Car {i}")).await?;
        }

        let view = home(&db).await?;
        assert_eq!(view.categories.len(), 1);
        assert_eq!(view.featured_cars.len(), 6);
        Ok(())
    }

    #[tokio::test]
    async fn test_car_detail_includes_user_rating() -> Result<()> {
        let (db, car) = setup_with_car().await?;
        crate::core::rating::submit_rating(&db, car.id, "alice", 4, "Smooth").await?;
        crate::core::rating::submit_rating(&db, car.id, "bob", 2, "Noisy").await?;

        let detail = car_detail(&db, car.id, Some("alice")).await?;
        assert_eq!(detail.ratings.len(), 2);
        assert_eq!(detail.ratings[0].user_id, "bob");
        assert_eq!(detail.user_rating.unwrap().rating, 4);
        assert_eq!(detail.listing.company_name, "Toyota");
        assert_eq!(detail.listing.category_name, "Compact");

        let anonymous = car_detail(&db, car.id, None).await?;
        assert!(anonymous.user_rating.is_none());

        let missing = car_detail(&db, 999, None).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::CarNotFound { car_id: 999 }
        ));
        Ok(())
    }
}
