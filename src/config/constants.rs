//! System-wide configuration constants

/// Sample buffer sizing
pub mod buffers {
    /// Samples kept per EEG channel (5 s at 256 Hz)
    pub const DEFAULT_EEG_CAPACITY: usize = 1280;
    /// Samples kept per PPG channel
    pub const DEFAULT_PPG_CAPACITY: usize = 1280;
    /// Samples kept per joystick axis
    pub const DEFAULT_JOYSTICK_CAPACITY: usize = 500;
    /// Upper bound accepted by validation
    pub const MAX_CAPACITY: usize = 5000;
}

/// Signal processing constants
pub mod signal {
    /// Nominal EEG sample rate of the headband
    pub const DEFAULT_EEG_SAMPLE_RATE_HZ: f64 = 256.0;
    /// Nominal PPG sample rate of the headband
    pub const DEFAULT_PPG_SAMPLE_RATE_HZ: f64 = 64.0;
    /// Default moving-average window in samples
    pub const DEFAULT_SMOOTHING_WINDOW: usize = 10;
}

/// Heart rate estimation constants
pub mod heart_rate {
    /// Lowest frequency considered a pulse (30 bpm)
    pub const DEFAULT_LOW_HZ: f64 = 0.5;
    /// Highest frequency considered a pulse (180 bpm)
    pub const DEFAULT_HIGH_HZ: f64 = 3.0;
    /// Seconds per minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Message protocol constants
pub mod protocol {
    /// Envelope version understood by this crate
    pub const MESSAGE_VERSION: u32 = 1;
}

/// Configuration file paths
pub mod paths {
    /// Default configuration file
    pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
    /// Local overrides
    pub const LOCAL_CONFIG_FILE: &str = "config/local.toml";
    /// Environment variable prefix for overrides
    pub const ENV_PREFIX: &str = "BIOSIGNAL_";
    /// Separator between nested keys in environment overrides
    pub const ENV_SEPARATOR: &str = "__";
}
