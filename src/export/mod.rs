pub mod csv;

pub use csv::CycleLog;
