// Constants for the step runner

/// Slowest setting of the speed slider
pub const SPEED_MIN: u8 = 5;

/// Fastest setting; steps run back to back
pub const SPEED_MAX: u8 = 100;

/// Slider position when nothing else is configured (100 ms per step)
pub const SPEED_DEFAULT: u8 = 50;

/// Milliseconds of delay per slider notch below the maximum
pub const DELAY_MS_PER_NOTCH: u64 = 2;
