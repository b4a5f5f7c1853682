pub mod site;
pub mod tasks;
