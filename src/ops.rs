pub mod buffer_throttle;
