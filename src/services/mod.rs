pub mod admission;
pub mod cache;
pub mod calendar;
pub mod clock;
pub mod duration;
pub mod occupancy;
pub mod ownership;
