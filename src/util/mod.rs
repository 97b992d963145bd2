pub mod timeout_iter;
