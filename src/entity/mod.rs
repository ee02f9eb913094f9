pub mod temperature_data;
