pub mod app;
pub mod decision;
pub mod gateway;
pub mod network;
pub mod source;
pub mod timetable;
pub mod util;
