//! Domain enums shared between the API and its clients

use crate::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// English name of a day-of-week value (0 = Sunday)
pub fn weekday_name(day: i16) -> Option<&'static str> {
    const NAMES: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    usize::try_from(day).ok().and_then(|i| NAMES.get(i).copied())
}

// ============================================================================
// Body measurement fields
// ============================================================================

/// Numeric body measurement that can be charted over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Weight,
    Height,
    BodyFat,
    MuscleMass,
    Chest,
    Waist,
    Hips,
    LeftArm,
    RightArm,
    LeftThigh,
    RightThigh,
    LeftCalf,
    RightCalf,
    Shoulders,
    Neck,
}

impl MeasurementField {
    pub const ALL: [MeasurementField; 15] = [
        MeasurementField::Weight,
        MeasurementField::Height,
        MeasurementField::BodyFat,
        MeasurementField::MuscleMass,
        MeasurementField::Chest,
        MeasurementField::Waist,
        MeasurementField::Hips,
        MeasurementField::LeftArm,
        MeasurementField::RightArm,
        MeasurementField::LeftThigh,
        MeasurementField::RightThigh,
        MeasurementField::LeftCalf,
        MeasurementField::RightCalf,
        MeasurementField::Shoulders,
        MeasurementField::Neck,
    ];

    /// Column name in the `body_measurements` table
    pub fn column(&self) -> &'static str {
        match self {
            MeasurementField::Weight => "weight",
            MeasurementField::Height => "height",
            MeasurementField::BodyFat => "body_fat",
            MeasurementField::MuscleMass => "muscle_mass",
            MeasurementField::Chest => "chest",
            MeasurementField::Waist => "waist",
            MeasurementField::Hips => "hips",
            MeasurementField::LeftArm => "left_arm",
            MeasurementField::RightArm => "right_arm",
            MeasurementField::LeftThigh => "left_thigh",
            MeasurementField::RightThigh => "right_thigh",
            MeasurementField::LeftCalf => "left_calf",
            MeasurementField::RightCalf => "right_calf",
            MeasurementField::Shoulders => "shoulders",
            MeasurementField::Neck => "neck",
        }
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl std::str::FromStr for MeasurementField {
    type Err = ModelError;

    /// Accepts both `body_fat` and `bodyFat` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .flat_map(|c| {
                if c.is_ascii_uppercase() {
                    vec!['_', c.to_ascii_lowercase()]
                } else {
                    vec![c]
                }
            })
            .collect();

        MeasurementField::ALL
            .iter()
            .find(|field| field.column() == normalized)
            .copied()
            .ok_or_else(|| ModelError::UnknownMeasurementField(s.to_string()))
    }
}

// ============================================================================
// Progress image formats
// ============================================================================

/// Image formats accepted for progress photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Resolve a format from the declared MIME type
    pub fn from_mime(mime: &str) -> Result<Self, ModelError> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(ImageFormat::Jpeg),
            "image/png" => Ok(ImageFormat::Png),
            "image/gif" => Ok(ImageFormat::Gif),
            "image/webp" => Ok(ImageFormat::Webp),
            _ => Err(ModelError::UnsupportedImageType(mime.to_string())),
        }
    }

    /// Resolve a format from a file name's extension
    pub fn from_file_name(file_name: &str) -> Result<Self, ModelError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or_else(|| ModelError::UnsupportedImageType(file_name.to_string()))?;

        match extension.as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            "webp" => Ok(ImageFormat::Webp),
            _ => Err(ModelError::UnsupportedImageType(file_name.to_string())),
        }
    }

    /// Both the MIME type and the file extension must name the same image format
    pub fn detect(mime: Option<&str>, file_name: Option<&str>) -> Result<Self, ModelError> {
        let mime = mime.ok_or_else(|| ModelError::UnsupportedImageType("unknown".to_string()))?;
        let from_mime = Self::from_mime(mime)?;
        let from_name = Self::from_file_name(file_name.unwrap_or_default())?;

        if from_mime != from_name {
            return Err(ModelError::ImageExtensionMismatch);
        }

        Ok(from_mime)
    }

    /// Extension used when storing the file
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(0), Some("Sunday"));
        assert_eq!(weekday_name(6), Some("Saturday"));
        assert_eq!(weekday_name(7), None);
        assert_eq!(weekday_name(-1), None);
    }

    #[rstest]
    #[case("weight", MeasurementField::Weight)]
    #[case("body_fat", MeasurementField::BodyFat)]
    #[case("bodyFat", MeasurementField::BodyFat)]
    #[case("muscleMass", MeasurementField::MuscleMass)]
    #[case("left_thigh", MeasurementField::LeftThigh)]
    #[case("rightCalf", MeasurementField::RightCalf)]
    fn test_measurement_field_parsing(#[case] input: &str, #[case] expected: MeasurementField) {
        assert_eq!(input.parse::<MeasurementField>().unwrap(), expected);
    }

    #[rstest]
    #[case("notes")]
    #[case("id")]
    #[case("weight; DROP TABLE users")]
    #[case("")]
    fn test_measurement_field_rejects_unknown(#[case] input: &str) {
        assert!(input.parse::<MeasurementField>().is_err());
    }

    #[test]
    fn test_every_field_round_trips_through_its_column() {
        for field in MeasurementField::ALL {
            assert_eq!(field.column().parse::<MeasurementField>().unwrap(), field);
        }
    }

    #[rstest]
    #[case("image/jpeg", "photo.jpg", ImageFormat::Jpeg)]
    #[case("image/jpeg", "photo.JPEG", ImageFormat::Jpeg)]
    #[case("image/png", "front.png", ImageFormat::Png)]
    #[case("image/gif", "anim.gif", ImageFormat::Gif)]
    #[case("image/webp", "side.webp", ImageFormat::Webp)]
    fn test_image_format_detection(
        #[case] mime: &str,
        #[case] name: &str,
        #[case] expected: ImageFormat,
    ) {
        assert_eq!(ImageFormat::detect(Some(mime), Some(name)).unwrap(), expected);
    }

    #[rstest]
    #[case(Some("text/plain"), Some("notes.txt"))]
    #[case(Some("application/pdf"), Some("report.pdf"))]
    #[case(Some("image/png"), Some("script.sh"))]
    #[case(Some("image/png"), Some("photo.jpg"))]
    #[case(Some("image/svg+xml"), Some("icon.svg"))]
    #[case(None, Some("photo.jpg"))]
    #[case(Some("image/jpeg"), None)]
    fn test_image_format_rejects_non_images(#[case] mime: Option<&str>, #[case] name: Option<&str>) {
        assert!(ImageFormat::detect(mime, name).is_err());
    }
}
