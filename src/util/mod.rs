pub mod alphabet;
pub mod genetic_code;
