pub mod anim;
pub mod body;
pub mod input;
