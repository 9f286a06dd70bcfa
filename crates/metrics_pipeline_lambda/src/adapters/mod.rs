pub mod aws;
pub mod object_store;
pub mod stack_outputs;
pub mod summary_table;
