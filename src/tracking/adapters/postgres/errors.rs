//! Translation of Diesel failures into the storage error taxonomy.

use crate::tracking::ports::{Constraint, StoreError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const SELF_DEPENDENCY_CONSTRAINT: &str = "ck_no_self_dependency";
const UNIQUE_DEPENDENCY_CONSTRAINT: &str = "uq_dependency";

enum Classification {
    Constraint(Constraint),
    Connection,
    Other,
}

fn classify(err: &DieselError) -> Classification {
    let DieselError::DatabaseError(kind, info) = err else {
        return Classification::Other;
    };
    let name = info.constraint_name();
    match kind {
        DatabaseErrorKind::CheckViolation if name == Some(SELF_DEPENDENCY_CONSTRAINT) => {
            Classification::Constraint(Constraint::SelfDependency)
        }
        DatabaseErrorKind::UniqueViolation if name == Some(UNIQUE_DEPENDENCY_CONSTRAINT) => {
            Classification::Constraint(Constraint::DuplicateDependency)
        }
        DatabaseErrorKind::ForeignKeyViolation => Classification::Constraint(
            Constraint::MissingReference(name.unwrap_or("foreign key").to_owned()),
        ),
        DatabaseErrorKind::UniqueViolation
        | DatabaseErrorKind::CheckViolation
        | DatabaseErrorKind::NotNullViolation => Classification::Constraint(Constraint::Other(
            name.unwrap_or_else(|| info.message()).to_owned(),
        )),
        DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand => {
            Classification::Connection
        }
        _ => Classification::Other,
    }
}

/// Maps a Diesel error onto [`StoreError`], naming the violated constraint
/// where the database reports one.
///
/// Diesel's `NotFound` carries no entity or key, so it lands in
/// [`StoreError::Persistence`]. Repository methods never let it through:
/// single-row reads use `.optional()` and writes check affected rows, then
/// raise [`StoreError::NotFound`] themselves.
pub(crate) fn map_diesel_error(err: DieselError) -> StoreError {
    match classify(&err) {
        Classification::Constraint(constraint) => StoreError::ConstraintViolation(constraint),
        Classification::Connection => StoreError::connection(err),
        Classification::Other => StoreError::persistence(err),
    }
}

/// Maps a pool checkout failure onto [`StoreError::ConnectionUnavailable`].
pub(crate) fn map_pool_error(err: diesel::r2d2::PoolError) -> StoreError {
    StoreError::connection(err)
}
