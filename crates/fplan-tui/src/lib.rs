// Terminal output for plans.

pub mod render;
