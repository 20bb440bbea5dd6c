pub mod model;
pub mod query;
pub mod settings;
pub mod sheet;
pub mod source;
pub mod status;
