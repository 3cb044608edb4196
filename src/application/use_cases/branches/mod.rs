pub mod branch_operations;
pub mod checkout_branch;
pub mod create_branch;
pub mod discard_changes;
pub mod errors;
