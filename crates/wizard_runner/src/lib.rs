pub mod order_runner;
