pub mod branches;
pub mod layouts;
