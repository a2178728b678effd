//! Failure origins and the halted status
//!
//! Transitions only ever see a single error flag. [`Fault`] records *which*
//! collaborator raised it so the halt can be reported to whatever monitors
//! the device.

/// Origin of the failure that raised the error flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Fault {
    /// Error flag found raised before anything ran
    Unexpected = 1,
    /// Network bring-up failed
    NetworkStart = 2,
    /// Clock synchronization failed
    TimeSync = 3,
    /// Session connect failed (and the retry budget, if any, ran out)
    SessionConnect = 4,
    /// Publishing a batch failed
    Publish = 5,
}

impl Fault {
    /// Decode a code stored in an atomic; `0` means no fault
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Unexpected),
            2 => Some(Self::NetworkStart),
            3 => Some(Self::TimeSync),
            4 => Some(Self::SessionConnect),
            5 => Some(Self::Publish),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for Fault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unexpected => write!(f, "Error flag raised before start"),
            Self::NetworkStart => write!(f, "Network bring-up failed"),
            Self::TimeSync => write!(f, "Time synchronization failed"),
            Self::SessionConnect => write!(f, "Session connect failed"),
            Self::Publish => write!(f, "Publish failed"),
        }
    }
}

impl core::error::Error for Fault {}

/// Returned by the worker loop once the machine enters `Fatal`
///
/// The machine makes no further progress after this; recovery needs a
/// device reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Halted {
    /// What caused the halt
    pub fault: Fault,
}

impl core::fmt::Display for Halted {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "connectivity halted: {}", self.fault)
    }
}

impl core::error::Error for Halted {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_code_round_trip() {
        for fault in [
            Fault::Unexpected,
            Fault::NetworkStart,
            Fault::TimeSync,
            Fault::SessionConnect,
            Fault::Publish,
        ] {
            assert_eq!(Fault::from_code(fault.code()), Some(fault));
        }
        assert_eq!(Fault::from_code(0), None);
        assert_eq!(Fault::from_code(6), None);
    }

    #[test]
    fn test_halted_display_names_fault() {
        let halted = Halted {
            fault: Fault::Publish,
        };
        assert_eq!(
            std::format!("{halted}"),
            "connectivity halted: Publish failed"
        );
    }
}
