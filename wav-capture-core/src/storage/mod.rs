pub mod portable_text;
pub mod sound;
