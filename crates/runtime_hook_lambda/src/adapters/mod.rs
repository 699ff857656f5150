pub mod parameter_store;
