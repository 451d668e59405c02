pub mod test_context;
pub mod testing;
