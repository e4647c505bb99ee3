pub mod driver;
pub mod model;
pub mod mutate;
pub mod plan;
pub mod resolve;
pub mod rules;
pub mod store;
