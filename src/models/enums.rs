use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
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

str_enum!(DocumentType {
    CaseHistory => "case_history",
    ConsultationNotes => "consultation_notes",
    Prescription => "prescription",
    Other => "other",
});

str_enum!(InputFormat {
    HandwrittenScan => "handwritten_scan",
    HandwrittenPhoto => "handwritten_photo",
    ExistingScan => "existing_scan",
});

str_enum!(DocumentStatus {
    Uploaded => "uploaded",
    NeedScanning => "need_scanning",
    Scanned => "scanned",
    Analyzing => "analyzing",
    Processing => "processing",
    Digitized => "digitized",
    Completed => "completed",
    Error => "error",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_type_round_trip() {
        for (variant, s) in [
            (DocumentType::CaseHistory, "case_history"),
            (DocumentType::ConsultationNotes, "consultation_notes"),
            (DocumentType::Prescription, "prescription"),
            (DocumentType::Other, "other"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn input_format_round_trip() {
        for (variant, s) in [
            (InputFormat::HandwrittenScan, "handwritten_scan"),
            (InputFormat::HandwrittenPhoto, "handwritten_photo"),
            (InputFormat::ExistingScan, "existing_scan"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(InputFormat::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn document_status_round_trip() {
        for (variant, s) in [
            (DocumentStatus::Uploaded, "uploaded"),
            (DocumentStatus::NeedScanning, "need_scanning"),
            (DocumentStatus::Scanned, "scanned"),
            (DocumentStatus::Analyzing, "analyzing"),
            (DocumentStatus::Processing, "processing"),
            (DocumentStatus::Digitized, "digitized"),
            (DocumentStatus::Completed, "completed"),
            (DocumentStatus::Error, "error"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(DocumentType::from_str("invalid").is_err());
        assert!(InputFormat::from_str("pdf").is_err());
        assert!(DocumentStatus::from_str("").is_err());
    }
}
