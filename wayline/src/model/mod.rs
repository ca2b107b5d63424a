pub mod joint;
pub mod linking;
pub mod tours;
