pub mod buttons;
pub mod led_bar;
pub mod serial_console;
pub mod seven_segment;

pub use buttons::ButtonHandler;
pub use led_bar::LedBar;
pub use serial_console::SerialConsole;
pub use seven_segment::SevenSegment;
