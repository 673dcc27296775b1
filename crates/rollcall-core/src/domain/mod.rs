pub mod phone;
pub mod verdict;

pub use phone::{normalize_phone, PhoneNumber, COUNTRY_PREFIX};
pub use verdict::{Verdict, VerdictLabels};
