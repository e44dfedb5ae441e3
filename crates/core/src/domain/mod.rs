pub mod contract;
pub mod product;
pub mod recommendation;
