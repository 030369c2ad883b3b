pub mod email;
pub mod locations;
pub mod maps;
