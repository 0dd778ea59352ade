pub mod amount;
pub mod frequency;
pub mod transaction;
