pub mod joint;
pub mod loops;
pub mod snap;
