pub mod builder;
pub mod client;
pub mod cloud_id;
pub mod indices;
pub mod model;

#[cfg(test)]
pub mod testing;
