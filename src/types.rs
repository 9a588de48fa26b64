// src/types.rs
//! Channel identifiers for the sensor streams

use serde::{Deserialize, Serialize};
use std::fmt;

/// EEG electrode positions of the headband
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Electrode {
    /// Left ear
    Tp9,
    /// Left forehead
    Af7,
    /// Right forehead
    Af8,
    /// Right ear
    Tp10,
    /// Optional auxiliary input
    RightAux,
}

impl Electrode {
    /// Scalp electrodes in stream column order
    pub const SCALP: [Electrode; 4] = [Electrode::Tp9, Electrode::Af7, Electrode::Af8, Electrode::Tp10];

    /// All electrodes including the auxiliary input, in stream column order
    pub const ALL: [Electrode; 5] = [
        Electrode::Tp9,
        Electrode::Af7,
        Electrode::Af8,
        Electrode::Tp10,
        Electrode::RightAux,
    ];

    /// Column index of this electrode in EEG rows
    pub fn index(self) -> usize {
        match self {
            Electrode::Tp9 => 0,
            Electrode::Af7 => 1,
            Electrode::Af8 => 2,
            Electrode::Tp10 => 3,
            Electrode::RightAux => 4,
        }
    }

    /// Electrode for a column index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Electrode::Tp9 => "TP9",
            Electrode::Af7 => "AF7",
            Electrode::Af8 => "AF8",
            Electrode::Tp10 => "TP10",
            Electrode::RightAux => "Right AUX",
        }
    }
}

impl fmt::Display for Electrode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Joystick axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoystickAxis {
    /// Horizontal axis (axis 0)
    X,
    /// Vertical axis (axis 1)
    Y,
}

impl JoystickAxis {
    /// Both axes in stream order
    pub const ALL: [JoystickAxis; 2] = [JoystickAxis::X, JoystickAxis::Y];

    /// Position of this axis in joystick pairs
    pub fn index(self) -> usize {
        match self {
            JoystickAxis::X => 0,
            JoystickAxis::Y => 1,
        }
    }
}

/// Number of PPG (optical) channels
pub const PPG_CHANNEL_COUNT: usize = 3;

/// A single sensor stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// EEG electrode
    Eeg(Electrode),
    /// PPG channel by index (0..3)
    Ppg(usize),
    /// Joystick axis
    Joystick(JoystickAxis),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Eeg(electrode) => write!(f, "EEG {}", electrode),
            Channel::Ppg(index) => write!(f, "PPG {}", index + 1),
            Channel::Joystick(axis) => write!(f, "Joystick {:?}", axis),
        }
    }
}
