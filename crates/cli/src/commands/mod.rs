pub mod cart;
pub mod quote;
pub mod relay;
pub mod tickets;
