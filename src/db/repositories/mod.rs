mod deleted_readings;
mod readings;
