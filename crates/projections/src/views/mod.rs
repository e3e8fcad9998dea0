//! View computations over a snapshot of the order tables.

pub mod archive;
pub mod kitchen;
pub mod sales;
