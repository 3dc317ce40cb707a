use thiserror::Error;

use crate::catalog::LookupError;
use crate::models::Category;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The requested item cannot fill the requested course. The order is
    /// left exactly as it was.
    #[error("invalid {course} selection '{name}': {reason}")]
    InvalidSelection {
        name: String,
        course: Category,
        #[source]
        reason: LookupError,
    },

    /// Adding the item would push an amount outside the representable range.
    /// The order is left exactly as it was.
    #[error("selecting '{name}' as {course} puts the order total out of range")]
    AmountOutOfRange { name: String, course: Category },
}
