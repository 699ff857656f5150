pub mod runtime_compliance;
