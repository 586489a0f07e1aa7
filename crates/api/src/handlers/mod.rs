pub mod companies;
pub mod score;
