pub mod affordability;
pub mod compare;
pub mod investment;
pub mod optimize;
pub mod rates;
pub mod stress;
pub mod variable_rate;
