pub mod deleted_reading;
pub mod reading;

pub use deleted_reading::{DeletedReading, UNKNOWN_ADDER_ID};
pub use reading::{Period, Reading};
