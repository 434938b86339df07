use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same wire string as the database column.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Doctor => "Doctor",
    Guardian => "Guardian",
    Patient => "Patient",
});

impl Role {
    /// Prefix for generated account IDs (`DOC-XXXXXX` etc.).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Role::Doctor => "DOC",
            Role::Guardian => "GAR",
            Role::Patient => "PAT",
        }
    }
}

str_enum!(DoseStatus {
    Pending => "pending",
    Taken => "taken",
    Missed => "missed",
});

str_enum!(NotificationType {
    MedicationTaken => "medication_taken",
});

str_enum!(SupplyLevel {
    Good => "Good",
    Low => "Low",
    Critical => "Critical",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trip() {
        for (variant, s) in [
            (Role::Doctor, "Doctor"),
            (Role::Guardian, "Guardian"),
            (Role::Patient, "Patient"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Role::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn role_id_prefixes() {
        assert_eq!(Role::Doctor.id_prefix(), "DOC");
        assert_eq!(Role::Guardian.id_prefix(), "GAR");
        assert_eq!(Role::Patient.id_prefix(), "PAT");
    }

    #[test]
    fn dose_status_round_trip() {
        for (variant, s) in [
            (DoseStatus::Pending, "pending"),
            (DoseStatus::Taken, "taken"),
            (DoseStatus::Missed, "missed"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DoseStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn supply_level_round_trip() {
        for (variant, s) in [
            (SupplyLevel::Good, "Good"),
            (SupplyLevel::Low, "Low"),
            (SupplyLevel::Critical, "Critical"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(SupplyLevel::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn serde_uses_wire_strings() {
        assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), "\"Patient\"");
        assert_eq!(
            serde_json::to_string(&DoseStatus::Taken).unwrap(),
            "\"taken\""
        );
        assert_eq!(
            serde_json::from_str::<DoseStatus>("\"pending\"").unwrap(),
            DoseStatus::Pending
        );
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Role::from_str("Admin").is_err());
        assert!(DoseStatus::from_str("skipped").is_err());
        assert!(NotificationType::from_str("").is_err());
    }
}
