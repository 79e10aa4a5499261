//! Rating business logic - one rating per user per car, plus the car's derived
//! `average_rating` and `total_ratings`.
//!
//! The aggregates are recomputed from the full set of ratings by
//! [`recompute_car_rating`], which [`submit_rating`] calls in the same transaction as
//! the rating write. Readers never see a rating without its updated aggregates.

use crate::{
    core::catalog,
    entities::{Car, CarRating, car, car_rating},
    errors::{Error, Result},
};
use sea_orm::{QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Lowest accepted rating
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

/// Derived rating fields of a car.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    /// Arithmetic mean, 0.0 when there are no ratings
    pub average_rating: f64,
    /// Number of ratings
    pub total_ratings: i32,
}

/// Computes the unweighted mean and count of `values`.
#[must_use]
pub fn aggregate(values: &[i32]) -> RatingAggregate {
    if values.is_empty() {
        return RatingAggregate {
            average_rating: 0.0,
            total_ratings: 0,
        };
    }

    let sum: i64 = values.iter().copied().map(i64::from).sum();
    let total_ratings = i32::try_from(values.len()).unwrap_or(i32::MAX);
    #[allow(clippy::cast_precision_loss)] // Sums of 1-5 ratings stay far below 2^52
    let average_rating = sum as f64 / f64::from(total_ratings);

    RatingAggregate {
        average_rating,
        total_ratings,
    }
}

/// Recomputes and stores `car_id`'s aggregates from its current ratings.
///
/// Pass the transaction that wrote the rating so both changes commit together.
pub async fn recompute_car_rating<C>(db: &C, car_id: i64) -> Result<car::Model>
where
    C: ConnectionTrait,
{
    let car = Car::find_by_id(car_id)
        .one(db)
        .await?
        .ok_or(Error::CarNotFound { car_id })?;

    let values: Vec<i32> = CarRating::find()
        .select_only()
        .column(car_rating::Column::Rating)
        .filter(car_rating::Column::CarId.eq(car_id))
        .into_tuple()
        .all(db)
        .await?;
    let RatingAggregate {
        average_rating,
        total_ratings,
    } = aggregate(&values);
    debug!(car_id, average_rating, total_ratings, "Recomputed car rating");

    let mut active: car::ActiveModel = car.into();
    active.average_rating = Set(average_rating);
    active.total_ratings = Set(total_ratings);
    active.update(db).await.map_err(Into::into)
}

/// Records `user_id`'s rating of `car_id`, replacing any earlier rating by the same
/// user, and returns the stored rating together with the car's updated aggregates.
///
/// # Errors
/// - `InvalidRating` if `value` is outside 1..=5 (no query is issued)
/// - `CarNotFound` if the car does not exist
/// - `Database` on persistence failure; neither the rating nor the car is changed
#[instrument(skip(db, comment))]
pub async fn submit_rating(
    db: &DatabaseConnection,
    car_id: i64,
    user_id: &str,
    value: i32,
    comment: &str,
) -> Result<(car_rating::Model, car::Model)> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(Error::InvalidRating { value });
    }

    let txn = db.begin().await?;
    catalog::lock_car(&txn, car_id).await?;

    let existing = CarRating::find()
        .filter(car_rating::Column::CarId.eq(car_id))
        .filter(car_rating::Column::UserId.eq(user_id))
        .one(&txn)
        .await?;

    let rating = if let Some(existing) = existing {
        let mut active: car_rating::ActiveModel = existing.into();
        active.rating = Set(value);
        active.comment = Set(comment.trim().to_string());
        active.update(&txn).await?
    } else {
        car_rating::ActiveModel {
            car_id: Set(car_id),
            user_id: Set(user_id.to_string()),
            rating: Set(value),
            comment: Set(comment.trim().to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?
    };

    let car = recompute_car_rating(&txn, car_id).await?;
    txn.commit().await?;

    info!(
        rating_id = rating.id,
        average_rating = car.average_rating,
        total_ratings = car.total_ratings,
        "Rating saved"
    );
    Ok((rating, car))
}

/// The rating `user_id` gave `car_id`, if any.
pub async fn get_user_rating(
    db: &DatabaseConnection,
    car_id: i64,
    user_id: &str,
) -> Result<Option<car_rating::Model>> {
    CarRating::find()
        .filter(car_rating::Column::CarId.eq(car_id))
        .filter(car_rating::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}
