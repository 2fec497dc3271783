pub mod explain;
pub mod ls;
pub mod plan;
