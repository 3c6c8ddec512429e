pub mod clear;
pub mod generate;
pub mod list;
pub mod weak;
