//! Attendance & leave accounting rules. Everything here except the two async
//! aggregator entry points is pure and synchronous.

pub mod dashboard;
pub mod filter;
pub mod leave_days;
pub mod monthly;
pub mod status;
pub mod work_time;
