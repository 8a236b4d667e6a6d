pub mod time_ops;
