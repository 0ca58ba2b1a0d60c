pub mod observation;
pub mod series;
