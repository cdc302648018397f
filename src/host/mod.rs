//! Host-facing contract and stdio bridge for driving the controller from an
//! external front end.

pub mod channel;
pub mod contract;
pub mod stdio;
