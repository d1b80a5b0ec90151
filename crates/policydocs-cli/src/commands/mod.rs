pub mod denormalize;
pub mod lookup;
pub mod seed;
