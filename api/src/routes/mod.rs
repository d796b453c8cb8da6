pub mod hermione;
pub mod system;
